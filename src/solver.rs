//! Common interface of the tour solvers and size-based tier selection.

use crate::error::Result;
use crate::exact::ExactTourSolver;
use crate::graph::{Vertex, Weight, WeightedGraph};
use crate::heuristics::construction::GreedyTourSolver;
use crate::heuristics::local_search::{ImprovingConfig, ImprovingTourSolver};
use crate::shortest_path;
use crate::solution::Solution;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A strategy that builds a cyclic tour through every vertex from `start`
pub trait TourSolver<V: Vertex> {
    fn solve(&self, graph: &WeightedGraph<V>, start: &V) -> Result<Solution<V>>;
    fn name(&self) -> &str;
}

/// Solver tier, picked from the expected number of vertices
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SolverTier {
    /// Exact bitmask DP, up to about 10 vertices
    Small,
    /// Nearest neighbor plus time-bounded 2-opt, around 300 vertices
    Medium,
    /// Nearest neighbor only, around 1000 vertices
    Large,
}

impl SolverTier {
    pub const SMALL_MAX_VERTICES: usize = 10;
    pub const MEDIUM_MAX_VERTICES: usize = 300;

    pub fn for_vertex_count(n: usize) -> Self {
        if n <= Self::SMALL_MAX_VERTICES {
            SolverTier::Small
        } else if n <= Self::MEDIUM_MAX_VERTICES {
            SolverTier::Medium
        } else {
            SolverTier::Large
        }
    }

    /// Wall-clock limit the tier is expected to meet on its intended input size
    pub fn time_contract(&self) -> Duration {
        match self {
            SolverTier::Small => Duration::from_secs(1),
            SolverTier::Medium => Duration::from_millis(1500),
            SolverTier::Large => Duration::from_millis(500),
        }
    }

    /// Solve with this tier's solver in its default configuration
    pub fn solve<V: Vertex>(&self, graph: &WeightedGraph<V>, start: &V) -> Result<Solution<V>> {
        match self {
            SolverTier::Small => ExactTourSolver::new().solve(graph, start),
            SolverTier::Medium => ImprovingTourSolver::new().solve(graph, start),
            SolverTier::Large => GreedyTourSolver::new().solve(graph, start),
        }
    }
}

impl std::fmt::Display for SolverTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SolverTier::Small => "small",
            SolverTier::Medium => "medium",
            SolverTier::Large => "large",
        };
        write!(f, "{}", name)
    }
}

impl<V: Vertex> WeightedGraph<V> {
    /// Dijkstra shortest path from `start` to `end`
    pub fn shortest_path(&self, start: &V, end: &V) -> (Weight, Vec<V>) {
        shortest_path::shortest_path(self, start, end)
    }

    /// Optimal tour for small graphs
    pub fn solve_exact(&self, start: &V) -> Result<(Weight, Vec<V>)> {
        ExactTourSolver::new().solve(self, start).map(Solution::into_parts)
    }

    /// Nearest-neighbor tour for large graphs
    pub fn solve_greedy(&self, start: &V) -> Result<(Weight, Vec<V>)> {
        GreedyTourSolver::new().solve(self, start).map(Solution::into_parts)
    }

    /// Nearest-neighbor tour improved by 2-opt until `time_budget` runs out
    pub fn solve_improving(&self, start: &V, time_budget: Duration) -> Result<(Weight, Vec<V>)> {
        let solver = ImprovingTourSolver::with_config(ImprovingConfig {
            time_budget,
            ..Default::default()
        });
        solver.solve(self, start).map(Solution::into_parts)
    }

    /// Solve with the tier matching this graph's size
    pub fn solve_auto(&self, start: &V) -> Result<Solution<V>> {
        SolverTier::for_vertex_count(self.vertex_count()).solve(self, start)
    }
}
