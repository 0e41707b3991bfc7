use crate::error::{GraphError, Result};
use crate::graph::{Vertex, WeightedGraph};
use crate::solution::Solution;
use crate::solver::TourSolver;
use ordered_float::OrderedFloat;
use std::collections::HashSet;
use std::time::Instant;

/// Nearest-neighbor tour from `start`.
///
/// Repeatedly steps to the cheapest unvisited neighbor of the current vertex;
/// ties go to the first neighbor in vertex order. Stops early if the current
/// vertex has no unvisited neighbor, so the tour may be partial on graphs that
/// are not complete.
pub fn nearest_neighbor_tour<V: Vertex>(graph: &WeightedGraph<V>, start: &V) -> Vec<V> {
    let n = graph.vertex_count();
    let mut tour = Vec::with_capacity(n);
    let mut visited: HashSet<&V> = HashSet::with_capacity(n);

    let Some(start) = graph.vertices().find(|&v| v == start) else {
        return tour;
    };
    tour.push(start.clone());
    visited.insert(start);
    let mut current = start;

    while visited.len() < n {
        let next = graph
            .edges_from(current)
            .filter(|(v, _)| !visited.contains(v))
            .min_by_key(|&(_, w)| OrderedFloat(w));

        match next {
            Some((v, _)) => {
                tour.push(v.clone());
                visited.insert(v);
                current = v;
            }
            None => {
                log::warn!(
                    "Nearest neighbor stalled at {:?} after {} of {} vertices",
                    current,
                    visited.len(),
                    n
                );
                break;
            }
        }
    }

    tour
}

/// Nearest Neighbor Heuristic
///
/// Deterministic: the same graph and start always give the same tour.
/// Intended for large complete graphs where only speed matters.
pub struct GreedyTourSolver;

impl GreedyTourSolver {
    pub fn new() -> Self {
        GreedyTourSolver
    }
}

impl Default for GreedyTourSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex> TourSolver<V> for GreedyTourSolver {
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
        if n == 1 {
            return Ok(Solution::with_cost(vec![start.clone()], 0.0, name));
        }

        let tour = nearest_neighbor_tour(graph, start);
        let mut solution = Solution::from_tour(graph, tour, name)?;
        solution.computation_time = timer.elapsed().as_secs_f64();

        log::debug!(
            "{} built a tour over {} of {} vertices: cost {} in {:.4}s",
            name,
            solution.tour.len(),
            n,
            solution.cost,
            solution.computation_time
        );
        Ok(solution)
    }

    fn name(&self) -> &str {
        "NearestNeighbor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::create_test_graph;

    #[test]
    fn test_nearest_neighbor() {
        let graph = create_test_graph();
        let solution = GreedyTourSolver::new().solve(&graph, &"A").unwrap();

        assert_eq!(solution.tour, vec!["A", "B", "C", "D"]);
        assert_eq!(solution.cost, 7.0);
    }

    #[test]
    fn test_ties_follow_vertex_order() {
        let mut graph = WeightedGraph::undirected();
        for v in 0..4 {
            graph.add_vertex(v);
        }
        for u in 0..4 {
            for v in (u + 1)..4 {
                graph.add_edge(&u, &v, 1.0).unwrap();
            }
        }

        assert_eq!(nearest_neighbor_tour(&graph, &2), vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_stalls_without_panicking() {
        // star: the center is the only way between leaves
        let mut graph = WeightedGraph::undirected();
        for v in ["hub", "x", "y", "z"] {
            graph.add_vertex(v);
        }
        for leaf in ["x", "y", "z"] {
            graph.add_edge(&"hub", &leaf, 1.0).unwrap();
        }

        let solution = GreedyTourSolver::new().solve(&graph, &"hub").unwrap();
        assert_eq!(solution.tour, vec!["hub", "x"]);
        assert!(!solution.is_complete(&graph));
        assert_eq!(solution.cost, 2.0);
    }

    #[test]
    fn test_missing_start() {
        let graph = create_test_graph();
        assert!(GreedyTourSolver::new().solve(&graph, &"Q").is_err());
        assert!(nearest_neighbor_tour(&graph, &"Q").is_empty());
    }

    #[test]
    fn test_empty_graph() {
        let graph: WeightedGraph<String> = WeightedGraph::undirected();
        let solution = GreedyTourSolver::new().solve(&graph, &"a".to_string()).unwrap();
        assert_eq!(solution.into_parts(), (0.0, Vec::<String>::new()));
    }
}
