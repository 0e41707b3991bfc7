//! Weighted graph representation.
//!
//! The graph is an adjacency map from each vertex to the weights of its
//! outgoing edges. Undirected graphs store every edge in both directions.
//! An absent edge is never stored; querying it yields `f64::INFINITY`.

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

/// Edge weight. `f64::INFINITY` stands for "no edge".
pub type Weight = f64;

/// Anything usable as a graph vertex: hashable, totally ordered and cheap to clone.
///
/// Integers, strings and tuples of those qualify. Floats do not.
pub trait Vertex: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug> Vertex for T {}

/// Dynamically typed vertex for graphs built from external data
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Str(String),
    Tuple(Vec<Key>),
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl TryFrom<&serde_json::Value> for Key {
    type Error = GraphError;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Key::Int)
                .ok_or_else(|| GraphError::InvalidVertexType(format!("non-integer number {}", n))),
            Value::String(s) => Ok(Key::Str(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(Key::try_from)
                .collect::<Result<Vec<_>>>()
                .map(Key::Tuple),
            Value::Null => Err(GraphError::InvalidVertexType("null".to_string())),
            Value::Bool(b) => Err(GraphError::InvalidVertexType(format!("boolean {}", b))),
            Value::Object(_) => Err(GraphError::InvalidVertexType("object".to_string())),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => write!(f, "{}", s),
            Key::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Directed or undirected graph with non-negative edge weights
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedGraph<V: Vertex> {
    directed: bool,
    adjacency: BTreeMap<V, BTreeMap<V, Weight>>,
}

impl<V: Vertex> WeightedGraph<V> {
    /// Create an empty graph
    pub fn new(directed: bool) -> Self {
        WeightedGraph {
            directed,
            adjacency: BTreeMap::new(),
        }
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Insert a vertex with no edges. No-op if it already exists.
    pub fn add_vertex(&mut self, vertex: V) {
        self.adjacency.entry(vertex).or_default();
    }

    /// Add a weighted edge. Existing weights are never overwritten: the first
    /// write wins, in each direction independently.
    pub fn add_edge(&mut self, src: &V, dest: &V, weight: Weight) -> Result<()> {
        if !self.adjacency.contains_key(src) {
            return Err(GraphError::missing(src));
        }
        if !self.adjacency.contains_key(dest) {
            return Err(GraphError::missing(dest));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight {
                src: format!("{:?}", src),
                dest: format!("{:?}", dest),
                weight,
            });
        }

        if let Some(edges) = self.adjacency.get_mut(src) {
            edges.entry(dest.clone()).or_insert(weight);
        }
        if !self.directed {
            if let Some(edges) = self.adjacency.get_mut(dest) {
                edges.entry(src.clone()).or_insert(weight);
            }
        }
        Ok(())
    }

    /// Remove an edge (both directions when undirected). Absent edges are ignored.
    pub fn remove_edge(&mut self, src: &V, dest: &V) {
        if let Some(edges) = self.adjacency.get_mut(src) {
            edges.remove(dest);
        }
        if !self.directed {
            if let Some(edges) = self.adjacency.get_mut(dest) {
                edges.remove(src);
            }
        }
    }

    /// Remove a vertex together with every edge pointing at it
    pub fn remove_vertex(&mut self, vertex: &V) {
        if self.adjacency.remove(vertex).is_some() {
            for edges in self.adjacency.values_mut() {
                edges.remove(vertex);
            }
        }
    }

    /// Neighbors of `vertex` in vertex order; empty if the vertex is absent
    pub fn neighbors(&self, vertex: &V) -> Vec<V> {
        self.adjacency
            .get(vertex)
            .map(|edges| edges.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Outgoing edges of `vertex` with their weights, in vertex order
    pub fn edges_from<'a>(&'a self, vertex: &V) -> impl Iterator<Item = (&'a V, Weight)> + 'a {
        self.adjacency
            .get(vertex)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(v, &w)| (v, w)))
    }

    /// Stored weight of `src -> dest`, or `f64::INFINITY` if there is no such edge
    #[inline]
    pub fn edge_weight(&self, src: &V, dest: &V) -> Weight {
        self.adjacency
            .get(src)
            .and_then(|edges| edges.get(dest))
            .copied()
            .unwrap_or(Weight::INFINITY)
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.adjacency.contains_key(vertex)
    }

    pub fn contains_edge(&self, src: &V, dest: &V) -> bool {
        self.edge_weight(src, dest).is_finite()
    }

    /// All vertices in vertex order
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.adjacency.keys()
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges; an undirected edge counts once
    pub fn edge_count(&self) -> usize {
        let stored: usize = self.adjacency.values().map(BTreeMap::len).sum();
        if self.directed {
            stored
        } else {
            let self_loops = self
                .adjacency
                .iter()
                .filter(|(v, edges)| edges.contains_key(*v))
                .count();
            (stored - self_loops) / 2 + self_loops
        }
    }

    /// Dense matrix of edge weights between `vertices`, indexed by position.
    /// The diagonal is 0 and missing edges are `f64::INFINITY`.
    pub fn distance_matrix(&self, vertices: &[V]) -> Vec<Vec<Weight>> {
        let n = vertices.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for (i, u) in vertices.iter().enumerate() {
            for (j, v) in vertices.iter().enumerate() {
                if i != j {
                    matrix[i][j] = self.edge_weight(u, v);
                }
            }
        }

        matrix
    }

    /// Length of a cyclic tour, including the edge from the last vertex back to
    /// the first. Returns `f64::INFINITY` as soon as an edge is missing.
    ///
    /// The closing vertex must stay implicit: a tour whose last element equals
    /// its first is rejected.
    pub fn tour_length(&self, tour: &[V]) -> Result<Weight> {
        if tour.len() > 1 && tour.first() == tour.last() {
            return Err(GraphError::InvalidTour(
                "tour must not repeat the start vertex at the end".to_string(),
            ));
        }

        let mut length = 0.0;
        for (i, src) in tour.iter().enumerate() {
            let dest = &tour[(i + 1) % tour.len()];
            let weight = self.edge_weight(src, dest);
            if weight.is_infinite() {
                return Ok(Weight::INFINITY);
            }
            length += weight;
        }
        Ok(length)
    }
}

impl<V: Vertex> Default for WeightedGraph<V> {
    fn default() -> Self {
        Self::undirected()
    }
}

impl WeightedGraph<Key> {
    /// Add a vertex given as a JSON value, checking that it is an integer,
    /// string or array of those.
    pub fn add_vertex_value(&mut self, value: &serde_json::Value) -> Result<Key> {
        let key = Key::try_from(value)?;
        self.add_vertex(key.clone());
        Ok(key)
    }
}

impl<V: Vertex> fmt::Display for WeightedGraph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (vertex, edges)) in self.adjacency.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: {{", vertex)?;
            for (j, (neighbor, weight)) in edges.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}: {}", neighbor, weight)?;
            }
            write!(f, "}}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Undirected square A-B-C-D with both diagonals
    pub(crate) fn create_test_graph() -> WeightedGraph<&'static str> {
        let mut graph = WeightedGraph::undirected();
        for v in ["A", "B", "C", "D"] {
            graph.add_vertex(v);
        }
        let edges = [
            ("A", "B", 1.0),
            ("A", "C", 4.0),
            ("A", "D", 3.0),
            ("B", "C", 2.0),
            ("B", "D", 5.0),
            ("C", "D", 1.0),
        ];
        for (u, v, w) in edges {
            graph.add_edge(&u, &v, w).unwrap();
        }
        graph
    }

    #[test]
    fn test_add_vertex_is_idempotent() {
        let mut graph = WeightedGraph::undirected();
        graph.add_vertex(1);
        graph.add_vertex(2);
        graph.add_edge(&1, &2, 3.0).unwrap();
        graph.add_vertex(1);

        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.neighbors(&1), vec![2]);
    }

    #[test]
    fn test_add_edge_missing_vertex() {
        let mut graph = WeightedGraph::undirected();
        graph.add_vertex("A");

        let err = graph.add_edge(&"A", &"B", 1.0).unwrap_err();
        assert!(matches!(err, GraphError::MissingVertex(_)));
        assert!(graph.neighbors(&"A").is_empty());
    }

    #[test]
    fn test_add_edge_rejects_bad_weights() {
        let mut graph = WeightedGraph::undirected();
        graph.add_vertex(0);
        graph.add_vertex(1);

        for weight in [-1.0, f64::NAN, f64::INFINITY] {
            let err = graph.add_edge(&0, &1, weight).unwrap_err();
            assert!(matches!(err, GraphError::InvalidWeight { .. }));
        }
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_first_write_wins() {
        let mut graph = WeightedGraph::undirected();
        graph.add_vertex("A");
        graph.add_vertex("B");
        graph.add_edge(&"A", &"B", 2.0).unwrap();
        let once = graph.clone();

        graph.add_edge(&"A", &"B", 2.0).unwrap();
        assert_eq!(graph, once);

        graph.add_edge(&"A", &"B", 9.0).unwrap();
        graph.add_edge(&"B", &"A", 9.0).unwrap();
        assert_eq!(graph.edge_weight(&"A", &"B"), 2.0);
        assert_eq!(graph.edge_weight(&"B", &"A"), 2.0);
    }

    #[test]
    fn test_undirected_symmetry() {
        let mut graph = create_test_graph();
        assert_eq!(graph.edge_weight(&"A", &"C"), 4.0);
        assert_eq!(graph.edge_weight(&"C", &"A"), 4.0);

        graph.remove_edge(&"A", &"C");
        assert_eq!(graph.edge_weight(&"A", &"C"), f64::INFINITY);
        assert_eq!(graph.edge_weight(&"C", &"A"), f64::INFINITY);

        // idempotent
        graph.remove_edge(&"A", &"C");
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn test_directed_edges() {
        let mut graph = WeightedGraph::directed();
        graph.add_vertex(1);
        graph.add_vertex(2);
        graph.add_edge(&1, &2, 4.0).unwrap();

        assert_eq!(graph.edge_weight(&1, &2), 4.0);
        assert_eq!(graph.edge_weight(&2, &1), f64::INFINITY);
        assert_eq!(graph.neighbors(&2), Vec::<i32>::new());

        graph.add_edge(&2, &1, 7.0).unwrap();
        graph.remove_edge(&1, &2);
        assert_eq!(graph.edge_weight(&2, &1), 7.0);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_remove_vertex_scrubs_edges() {
        let mut graph = create_test_graph();
        graph.remove_vertex(&"C");

        assert!(!graph.contains_vertex(&"C"));
        assert_eq!(graph.neighbors(&"A"), vec!["B", "D"]);
        assert_eq!(graph.neighbors(&"C"), Vec::<&str>::new());
        assert_eq!(graph.tour_length(&["A", "B", "D"]).unwrap(), 9.0);

        graph.remove_vertex(&"C");
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn test_tour_length() {
        let graph = create_test_graph();
        assert_eq!(graph.tour_length(&["A", "B", "C", "D"]).unwrap(), 7.0);
        assert_eq!(graph.tour_length(&["A", "C", "B", "D"]).unwrap(), 14.0);
        assert_eq!(graph.tour_length(&[]).unwrap(), 0.0);
    }

    #[test]
    fn test_tour_length_missing_edge() {
        let mut graph = create_test_graph();
        graph.remove_edge(&"D", &"A");
        assert_eq!(graph.tour_length(&["A", "B", "C", "D"]).unwrap(), f64::INFINITY);
        assert_eq!(graph.tour_length(&["A", "B", "Z"]).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_distance_matrix() {
        let mut graph = create_test_graph();
        graph.remove_edge(&"A", &"C");
        let matrix = graph.distance_matrix(&["A", "B", "C"]);

        assert_eq!(matrix[0][0], 0.0);
        assert_eq!(matrix[0][1], 1.0);
        assert_eq!(matrix[2][1], 2.0);
        assert_eq!(matrix[0][2], f64::INFINITY);
    }

    #[test]
    fn test_tour_length_rejects_closed_tour() {
        let graph = create_test_graph();
        let err = graph.tour_length(&["A", "B", "C", "D", "A"]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidTour(_)));
    }

    #[test]
    fn test_tuple_vertices() {
        let mut graph: WeightedGraph<(i32, &str)> = WeightedGraph::undirected();
        graph.add_vertex((0, "depot"));
        graph.add_vertex((1, "shop"));
        graph.add_edge(&(0, "depot"), &(1, "shop"), 2.5).unwrap();
        assert_eq!(graph.tour_length(&[(0, "depot"), (1, "shop")]).unwrap(), 5.0);
    }

    #[test]
    fn test_key_from_json() {
        assert_eq!(Key::try_from(&json!(3)).unwrap(), Key::Int(3));
        assert_eq!(Key::try_from(&json!("x")).unwrap(), Key::from("x"));
        assert_eq!(
            Key::try_from(&json!([1, "a"])).unwrap(),
            Key::Tuple(vec![Key::Int(1), Key::from("a")])
        );

        for bad in [json!(1.5), json!(null), json!(true), json!({"a": 1}), json!([1, 2.5])] {
            let err = Key::try_from(&bad).unwrap_err();
            assert!(matches!(err, GraphError::InvalidVertexType(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_add_vertex_value() {
        let mut graph = WeightedGraph::<Key>::undirected();
        let key = graph.add_vertex_value(&json!([2, 3])).unwrap();
        assert_eq!(key.to_string(), "(2, 3)");
        assert!(graph.contains_vertex(&key));

        assert!(graph.add_vertex_value(&json!(0.5)).is_err());
        assert_eq!(graph.vertex_count(), 1);
    }

    #[test]
    fn test_display() {
        let mut graph = WeightedGraph::directed();
        graph.add_vertex(1);
        graph.add_vertex(2);
        graph.add_edge(&1, &2, 1.5).unwrap();
        assert_eq!(graph.to_string(), "{1: {2: 1.5}, 2: {}}");
    }
}
