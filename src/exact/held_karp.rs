//! Exact TSP by bitmask dynamic programming over visited subsets.
//!
//! `O(2^n * n^2)` time and `O(2^n * n)` memory, so the solver refuses graphs
//! above its configured vertex limit instead of allocating the table.

use crate::error::{GraphError, Result};
use crate::graph::{Vertex, Weight, WeightedGraph};
use crate::solution::Solution;
use crate::solver::TourSolver;
use std::time::Instant;

/// Largest vertex count the DP table may ever be sized for
pub const MAX_EXACT_VERTICES: usize = 16;

const NO_PREDECESSOR: u8 = u8::MAX;

#[derive(Debug, Clone)]
pub struct ExactConfig {
    /// Refuse graphs with more vertices than this (clamped to `MAX_EXACT_VERTICES`)
    pub max_vertices: usize,
}

impl Default for ExactConfig {
    fn default() -> Self {
        ExactConfig { max_vertices: 12 }
    }
}

/// Optimal tour solver for small graphs
pub struct ExactTourSolver {
    pub config: ExactConfig,
}

impl ExactTourSolver {
    pub fn new() -> Self {
        Self::with_config(ExactConfig::default())
    }

    pub fn with_config(config: ExactConfig) -> Self {
        ExactTourSolver { config }
    }

    /// Effective vertex limit
    pub fn vertex_limit(&self) -> usize {
        self.config.max_vertices.min(MAX_EXACT_VERTICES)
    }
}

impl Default for ExactTourSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex> TourSolver<V> for ExactTourSolver {
    fn solve(&self, graph: &WeightedGraph<V>, start: &V) -> Result<Solution<V>> {
        let timer = Instant::now();
        let name = TourSolver::<V>::name(self);
        let n = graph.vertex_count();

        if n == 0 {
            return Ok(Solution::new(name));
        }
        if !graph.contains_vertex(start) {
            return Err(GraphError::missing(start));
        }
        let limit = self.vertex_limit();
        if n > limit {
            return Err(GraphError::CapacityExceeded { vertices: n, limit });
        }
        if n == 1 {
            return Ok(Solution::with_cost(vec![start.clone()], 0.0, name));
        }

        let vertices: Vec<V> = graph.vertices().cloned().collect();
        let start_idx = vertices
            .iter()
            .position(|v| v == start)
            .ok_or_else(|| GraphError::missing(start))?;
        let dist = graph.distance_matrix(&vertices);

        let table = SubsetTable::fill(&dist, start_idx);
        let mut solution = match table.best_cycle(&dist) {
            Some((cost, order)) => {
                let tour = order.into_iter().map(|i| vertices[i].clone()).collect();
                Solution::with_cost(tour, cost, name)
            }
            None => {
                log::debug!("No Hamiltonian cycle through {} vertices", n);
                Solution::with_cost(Vec::new(), Weight::INFINITY, name)
            }
        };

        solution.computation_time = timer.elapsed().as_secs_f64();
        log::debug!(
            "{} solved {} vertices: cost {} in {:.4}s",
            name,
            n,
            solution.cost,
            solution.computation_time
        );
        Ok(solution)
    }

    fn name(&self) -> &str {
        "Exact-DP"
    }
}

/// `cost[mask * n + v]`: cheapest path from the start that visits exactly the
/// vertices in `mask` and ends at `v`
struct SubsetTable {
    n: usize,
    start: usize,
    cost: Vec<Weight>,
    predecessor: Vec<u8>,
}

impl SubsetTable {
    fn fill(dist: &[Vec<Weight>], start: usize) -> Self {
        let n = dist.len();
        let size = (1usize << n) * n;
        let mut table = SubsetTable {
            n,
            start,
            cost: vec![Weight::INFINITY; size],
            predecessor: vec![NO_PREDECESSOR; size],
        };

        let start_bit = 1usize << start;
        let origin = table.index(start_bit, start);
        table.cost[origin] = 0.0;

        for mask in 0..(1usize << n) {
            if mask & start_bit == 0 {
                continue;
            }
            for u in 0..n {
                if mask & (1 << u) == 0 {
                    continue;
                }
                let cost_u = table.cost[table.index(mask, u)];
                if !cost_u.is_finite() {
                    continue;
                }
                for v in 0..n {
                    if mask & (1 << v) != 0 {
                        continue;
                    }
                    let next = table.index(mask | (1 << v), v);
                    let candidate = cost_u + dist[u][v];
                    if candidate < table.cost[next] {
                        table.cost[next] = candidate;
                        table.predecessor[next] = u as u8;
                    }
                }
            }
        }

        table
    }

    #[inline]
    fn index(&self, mask: usize, v: usize) -> usize {
        mask * self.n + v
    }

    /// Cheapest closed cycle and its vertex order starting at `start`
    fn best_cycle(&self, dist: &[Vec<Weight>]) -> Option<(Weight, Vec<usize>)> {
        let full = (1usize << self.n) - 1;

        let mut best_cost = Weight::INFINITY;
        let mut last = None;
        for v in (0..self.n).filter(|&v| v != self.start) {
            let cost = self.cost[self.index(full, v)] + dist[v][self.start];
            if cost < best_cost {
                best_cost = cost;
                last = Some(v);
            }
        }

        let mut order = Vec::with_capacity(self.n);
        let mut mask = full;
        let mut current = last?;
        loop {
            order.push(current);
            let prev = self.predecessor[self.index(mask, current)];
            if prev == NO_PREDECESSOR {
                break;
            }
            mask ^= 1 << current;
            current = prev as usize;
        }
        order.reverse();

        Some((best_cost, order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::create_test_graph;

    #[test]
    fn test_four_vertex_scenario() {
        let graph = create_test_graph();
        let solution = ExactTourSolver::new().solve(&graph, &"A").unwrap();

        assert_eq!(solution.cost, 7.0);
        assert!(
            solution.tour == vec!["A", "B", "C", "D"] || solution.tour == vec!["A", "D", "C", "B"],
            "{:?}",
            solution.tour
        );
        assert_eq!(graph.tour_length(&solution.tour).unwrap(), 7.0);
    }

    #[test]
    fn test_start_is_preserved() {
        let graph = create_test_graph();
        for start in ["A", "B", "C", "D"] {
            let solution = ExactTourSolver::new().solve(&graph, &start).unwrap();
            assert_eq!(solution.tour[0], start);
            assert_eq!(solution.cost, 7.0);
        }
    }

    #[test]
    fn test_directed_cycle() {
        let mut graph = WeightedGraph::directed();
        for v in 0..4 {
            graph.add_vertex(v);
        }
        graph.add_edge(&0, &1, 1.0).unwrap();
        graph.add_edge(&1, &2, 1.0).unwrap();
        graph.add_edge(&2, &3, 1.0).unwrap();
        graph.add_edge(&3, &0, 1.0).unwrap();
        graph.add_edge(&0, &3, 0.5).unwrap();

        let solution = ExactTourSolver::new().solve(&graph, &2).unwrap();
        assert_eq!(solution.cost, 4.0);
        assert_eq!(solution.tour, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_no_hamiltonian_cycle() {
        let mut graph = WeightedGraph::undirected();
        for v in 0..3 {
            graph.add_vertex(v);
        }
        graph.add_edge(&0, &1, 1.0).unwrap();
        graph.add_edge(&1, &2, 1.0).unwrap();

        let solution = ExactTourSolver::new().solve(&graph, &0).unwrap();
        assert_eq!(solution.cost, f64::INFINITY);
        assert!(solution.tour.is_empty());
    }

    #[test]
    fn test_degenerate_graphs() {
        let empty: WeightedGraph<u8> = WeightedGraph::undirected();
        let solution = ExactTourSolver::new().solve(&empty, &0).unwrap();
        assert_eq!(solution.into_parts(), (0.0, vec![]));

        let mut single = WeightedGraph::undirected();
        single.add_vertex(7u8);
        let solution = ExactTourSolver::new().solve(&single, &7).unwrap();
        assert_eq!(solution.into_parts(), (0.0, vec![7]));
    }

    #[test]
    fn test_missing_start() {
        let graph = create_test_graph();
        let err = ExactTourSolver::new().solve(&graph, &"Z").unwrap_err();
        assert!(matches!(err, GraphError::MissingVertex(_)));
    }

    #[test]
    fn test_capacity_limit() {
        let mut graph = WeightedGraph::undirected();
        for v in 0..20 {
            graph.add_vertex(v);
        }

        let err = ExactTourSolver::new().solve(&graph, &0).unwrap_err();
        assert_eq!(err, GraphError::CapacityExceeded { vertices: 20, limit: 12 });

        let solver = ExactTourSolver::with_config(ExactConfig { max_vertices: 100 });
        assert_eq!(solver.vertex_limit(), MAX_EXACT_VERTICES);
        assert!(solver.solve(&graph, &0).is_err());
    }
}
