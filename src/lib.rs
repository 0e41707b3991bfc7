//! Graph Tour Solver Library
//!
//! A weighted graph with Dijkstra shortest paths and three tiers of
//! Travelling Salesman solving, each tuned to a problem size and time budget.
//!
//! # Features
//!
//! - Directed or undirected adjacency-map graph over any hashable, ordered vertex type
//! - Dijkstra single-pair shortest path
//! - Exact bitmask DP solver for small graphs (about 10 vertices, under 1 s)
//! - Nearest-neighbor construction for large graphs (about 1000 vertices, under 0.5 s)
//! - Nearest neighbor plus time-bounded 2-opt for medium graphs (about 300 vertices, under 1.5 s)
//! - Benchmarking against each tier's time contract
//!
//! # Example
//!
//! ```
//! use graph_tour_solver::WeightedGraph;
//! use std::time::Duration;
//!
//! let mut graph = WeightedGraph::undirected();
//! for v in ["A", "B", "C", "D"] {
//!     graph.add_vertex(v);
//! }
//! for (u, v, w) in [("A", "B", 1.0), ("A", "C", 4.0), ("A", "D", 3.0),
//!                   ("B", "C", 2.0), ("B", "D", 5.0), ("C", "D", 1.0)] {
//!     graph.add_edge(&u, &v, w).unwrap();
//! }
//!
//! let (cost, tour) = graph.solve_exact(&"A").unwrap();
//! assert_eq!(cost, 7.0);
//! assert_eq!(tour.len(), 4);
//!
//! let (cost, _) = graph.solve_improving(&"A", Duration::from_millis(100)).unwrap();
//! assert!(cost >= 7.0);
//!
//! assert_eq!(graph.shortest_path(&"A", &"C"), (3.0, vec!["A", "B", "C"]));
//! ```

pub mod benchmark;
pub mod deadline;
pub mod error;
pub mod exact;
pub mod graph;
pub mod heuristics;
pub mod loading;
pub mod shortest_path;
pub mod solution;
pub mod solver;

pub use error::{GraphError, Result};
pub use exact::{ExactConfig, ExactTourSolver};
pub use graph::{Key, Vertex, Weight, WeightedGraph};
pub use heuristics::{GreedyTourSolver, ImprovingConfig, ImprovingTourSolver};
pub use solution::Solution;
pub use solver::{SolverTier, TourSolver};
