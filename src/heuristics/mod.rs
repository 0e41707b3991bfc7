//! Heuristics module.
//!
//! Nearest-neighbor construction for large graphs and a time-bounded 2-opt
//! improvement on top of it for medium graphs.

pub mod construction;
pub mod local_search;

pub use construction::*;
pub use local_search::*;
