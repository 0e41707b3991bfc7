//! Error types for graph construction and tour solving.
//!
//! Missing edges are never errors: they read as `f64::INFINITY`. Only caller
//! input that cannot be represented in the graph ends up here.

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, GraphError>;

/// Caller-input validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Vertex value is not an integer, string or tuple of those
    #[error("Invalid vertex type: {0}")]
    InvalidVertexType(String),

    /// An operation referenced a vertex that is not in the graph
    #[error("Missing vertex: {0}")]
    MissingVertex(String),

    /// Tour repeats its first vertex at the end
    #[error("Invalid tour: {0}")]
    InvalidTour(String),

    /// Edge weight is negative, NaN or infinite
    #[error("Invalid weight {weight} on edge {src} -> {dest}")]
    InvalidWeight {
        src: String,
        dest: String,
        weight: f64,
    },

    /// Exact solver refused a graph too large for its DP table
    #[error("Exact solver supports at most {limit} vertices, graph has {vertices}")]
    CapacityExceeded { vertices: usize, limit: usize },

    /// External graph description has the wrong shape
    #[error("Malformed graph description: {0}")]
    Malformed(String),
}

impl GraphError {
    pub(crate) fn missing<V: std::fmt::Debug>(vertex: &V) -> Self {
        GraphError::MissingVertex(format!("{:?}", vertex))
    }
}
