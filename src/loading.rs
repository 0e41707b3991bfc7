//! Building graphs from in-memory JSON descriptions.
//!
//! Expected shape:
//!
//! ```json
//! {
//!   "directed": false,
//!   "vertices": ["A", "B", [0, 1]],
//!   "edges": [["A", "B", 1.5], ["B", [0, 1], 2]]
//! }
//! ```
//!
//! `directed` defaults to `false`. Edge endpoints must be listed under
//! `vertices` first, like calls to `add_edge` on a hand-built graph.

use crate::error::{GraphError, Result};
use crate::graph::{Key, WeightedGraph};
use serde_json::Value;

/// Parse a JSON string into a graph
pub fn graph_from_json_str(input: &str) -> Result<WeightedGraph<Key>> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| GraphError::Malformed(e.to_string()))?;
    graph_from_json(&value)
}

/// Build a graph from an already parsed JSON value
pub fn graph_from_json(value: &Value) -> Result<WeightedGraph<Key>> {
    let object = value
        .as_object()
        .ok_or_else(|| GraphError::Malformed("expected a JSON object".to_string()))?;

    let directed = match object.get("directed") {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            return Err(GraphError::Malformed(format!(
                "\"directed\" must be a boolean, got {}",
                other
            )))
        }
    };

    let mut graph = WeightedGraph::new(directed);

    for vertex in array_field(object, "vertices")? {
        graph.add_vertex_value(vertex)?;
    }

    for edge in array_field(object, "edges")? {
        let (src, dest, weight) = match edge.as_array().map(Vec::as_slice) {
            Some([src, dest, weight]) => (src, dest, weight),
            _ => {
                return Err(GraphError::Malformed(format!(
                    "edge must be [src, dest, weight], got {}",
                    edge
                )))
            }
        };
        let weight = weight
            .as_f64()
            .ok_or_else(|| GraphError::Malformed(format!("edge weight must be a number, got {}", weight)))?;

        graph.add_edge(&Key::try_from(src)?, &Key::try_from(dest)?, weight)?;
    }

    log::debug!(
        "Loaded graph with {} vertices and {} edges (directed: {})",
        graph.vertex_count(),
        graph.edge_count(),
        directed
    );

    Ok(graph)
}

fn array_field<'a>(object: &'a serde_json::Map<String, Value>, field: &str) -> Result<&'a [Value]> {
    match object.get(field) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(GraphError::Malformed(format!(
            "\"{}\" must be an array, got {}",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_undirected_graph() {
        let graph = graph_from_json(&json!({
            "vertices": ["A", "B", "C"],
            "edges": [["A", "B", 1], ["B", "C", 2.5]]
        }))
        .unwrap();

        assert!(!graph.is_directed());
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_weight(&Key::from("C"), &Key::from("B")), 2.5);
    }

    #[test]
    fn test_load_tuple_vertices_directed() {
        let graph = graph_from_json_str(
            r#"{"directed": true, "vertices": [[0, 0], [0, 1]], "edges": [[[0, 0], [0, 1], 4]]}"#,
        )
        .unwrap();

        let a = Key::Tuple(vec![Key::Int(0), Key::Int(0)]);
        let b = Key::Tuple(vec![Key::Int(0), Key::Int(1)]);
        assert_eq!(graph.edge_weight(&a, &b), 4.0);
        assert_eq!(graph.edge_weight(&b, &a), f64::INFINITY);
    }

    #[test]
    fn test_load_errors() {
        let err = graph_from_json(&json!({"vertices": [1.5]})).unwrap_err();
        assert!(matches!(err, GraphError::InvalidVertexType(_)));

        let err = graph_from_json(&json!({"vertices": [1], "edges": [[1, 2, 3]]})).unwrap_err();
        assert!(matches!(err, GraphError::MissingVertex(_)));

        let err = graph_from_json(&json!({"vertices": [1, 2], "edges": [[1, 2]]})).unwrap_err();
        assert!(matches!(err, GraphError::Malformed(_)));

        let err = graph_from_json(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, GraphError::Malformed(_)));

        assert!(graph_from_json_str("{not json").is_err());
    }
}
