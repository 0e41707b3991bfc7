//! Solution representation for tour solvers.
//!
//! A tour is an ordered sequence of distinct vertices. It is implicitly
//! cyclic and never stores the closing return to its first vertex.

use crate::error::Result;
use crate::graph::{Vertex, Weight, WeightedGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Represents a tour produced by a solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution<V> {
    /// The tour, starting at the requested start vertex
    pub tour: Vec<V>,
    /// Total tour length, `f64::INFINITY` if some tour edge is missing
    pub cost: Weight,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of improving moves applied (if applicable)
    pub iterations: Option<usize>,
    /// Whether the solver stopped on its deadline rather than converging
    pub timed_out: bool,
}

impl<V: Vertex> Solution<V> {
    /// Create a new empty solution
    pub fn new(algorithm: &str) -> Self {
        Solution {
            tour: Vec::new(),
            cost: 0.0,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
            timed_out: false,
        }
    }

    /// Create a solution from a tour, evaluating its length on `graph`
    pub fn from_tour(graph: &WeightedGraph<V>, tour: Vec<V>, algorithm: &str) -> Result<Self> {
        let cost = graph.tour_length(&tour)?;
        Ok(Self::with_cost(tour, cost, algorithm))
    }

    /// Create a solution whose cost is already known
    pub fn with_cost(tour: Vec<V>, cost: Weight, algorithm: &str) -> Self {
        Solution {
            tour,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
            timed_out: false,
        }
    }

    /// Check that every vertex of `graph` is visited exactly once
    pub fn is_complete(&self, graph: &WeightedGraph<V>) -> bool {
        if self.tour.len() != graph.vertex_count() {
            return false;
        }
        let unique: HashSet<&V> = self.tour.iter().collect();
        unique.len() == self.tour.len() && self.tour.iter().all(|v| graph.contains_vertex(v))
    }

    /// Whether every tour edge, including the closing one, exists
    pub fn is_feasible(&self) -> bool {
        self.cost.is_finite()
    }

    /// Get the position of a vertex in the tour
    pub fn position(&self, vertex: &V) -> Option<usize> {
        self.tour.iter().position(|v| v == vertex)
    }

    /// Split into the `(cost, tour)` pair
    pub fn into_parts(self) -> (Weight, Vec<V>) {
        (self.cost, self.tour)
    }
}

impl<V: Vertex> std::fmt::Display for Solution<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        if self.timed_out {
            writeln!(f, "  Stopped on deadline")?;
        }
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}
