//! Single-pair shortest path search (Dijkstra).
//!
//! Edge weights are assumed non-negative, which `WeightedGraph::add_edge`
//! enforces. The search stops as soon as the target is popped from the queue.

use crate::graph::{Vertex, Weight, WeightedGraph};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Cheapest path from `start` to `end`.
///
/// Returns the path cost and the vertices on the path, both endpoints
/// included. `(f64::INFINITY, [])` means `end` is unreachable.
pub fn shortest_path<V: Vertex>(graph: &WeightedGraph<V>, start: &V, end: &V) -> (Weight, Vec<V>) {
    let mut queue = BinaryHeap::new();
    let mut best: HashMap<V, Weight> = HashMap::new();
    let mut predecessor: HashMap<V, V> = HashMap::new();
    let mut visited: HashSet<V> = HashSet::new();

    best.insert(start.clone(), 0.0);
    queue.push(Reverse((OrderedFloat(0.0), start.clone())));

    while let Some(Reverse((OrderedFloat(cost), vertex))) = queue.pop() {
        if &vertex == end {
            let path = reconstruct_path(&predecessor, start, vertex);
            log::trace!("Shortest path of cost {} over {} vertices", cost, path.len());
            return (cost, path);
        }
        if !visited.insert(vertex.clone()) {
            continue;
        }

        for (neighbor, weight) in graph.edges_from(&vertex) {
            if visited.contains(neighbor) {
                continue;
            }
            let candidate = cost + weight;
            let improves = best.get(neighbor).map_or(true, |&known| candidate < known);
            if improves {
                best.insert(neighbor.clone(), candidate);
                predecessor.insert(neighbor.clone(), vertex.clone());
                queue.push(Reverse((OrderedFloat(candidate), neighbor.clone())));
            }
        }
    }

    (Weight::INFINITY, Vec::new())
}

fn reconstruct_path<V: Vertex>(predecessor: &HashMap<V, V>, start: &V, end: V) -> Vec<V> {
    let mut path = vec![end];
    while let Some(last) = path.last() {
        if last == start {
            break;
        }
        match predecessor.get(last) {
            Some(prev) => path.push(prev.clone()),
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::create_test_graph;

    #[test]
    fn test_same_vertex() {
        let graph = create_test_graph();
        assert_eq!(shortest_path(&graph, &"B", &"B"), (0.0, vec!["B"]));
    }

    #[test]
    fn test_prefers_cheaper_detour() {
        let graph = create_test_graph();
        // A-C costs 4 directly, A-B-C costs 3
        assert_eq!(shortest_path(&graph, &"A", &"C"), (3.0, vec!["A", "B", "C"]));
        // B-D costs 5 directly, B-C-D costs 3
        assert_eq!(shortest_path(&graph, &"B", &"D"), (3.0, vec!["B", "C", "D"]));
    }

    #[test]
    fn test_unreachable() {
        let mut graph = create_test_graph();
        graph.add_vertex("E");
        assert_eq!(shortest_path(&graph, &"A", &"E"), (f64::INFINITY, vec![]));
        assert_eq!(shortest_path(&graph, &"Z", &"A"), (f64::INFINITY, vec![]));
    }

    #[test]
    fn test_directed_respects_orientation() {
        let mut graph = WeightedGraph::directed();
        for v in 0..4 {
            graph.add_vertex(v);
        }
        graph.add_edge(&0, &1, 1.0).unwrap();
        graph.add_edge(&1, &2, 1.0).unwrap();
        graph.add_edge(&2, &3, 1.0).unwrap();
        graph.add_edge(&3, &0, 10.0).unwrap();

        assert_eq!(shortest_path(&graph, &0, &3), (3.0, vec![0, 1, 2, 3]));
        assert_eq!(shortest_path(&graph, &3, &2), (12.0, vec![3, 0, 1, 2]));
    }

    #[test]
    fn test_zero_weight_edges() {
        let mut graph = WeightedGraph::undirected();
        for v in ["s", "m", "t"] {
            graph.add_vertex(v);
        }
        graph.add_edge(&"s", &"m", 0.0).unwrap();
        graph.add_edge(&"m", &"t", 0.0).unwrap();
        graph.add_edge(&"s", &"t", 1.0).unwrap();

        assert_eq!(shortest_path(&graph, &"s", &"t"), (0.0, vec!["s", "m", "t"]));
    }
}
