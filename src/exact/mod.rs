//! Exact solvers module.

mod held_karp;

pub use held_karp::*;
