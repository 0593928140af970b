//! Grafo: content-addressable directed graph engine
//!
//! A directed-graph store for arbitrary application-defined JSON values
//! ("vertices") plus edges between them:
//!
//! - identity-based CRUD with per-instance identity strategies
//! - content-addressable hashing (canonical JSON, SHA-1) for stable
//!   cross-process identity
//! - id-keyed and hash-keyed serialization that round-trip into each other
//! - structural diff between two graph snapshots with ordered events
//! - cycle-safe leaf-first (dependency-order) traversal
//! - a persistent/immutable graph variant where every mutation returns a
//!   new value and old snapshots stay valid
//!
//! # Example
//!
//! ```rust
//! use grafo::Graph;
//! use serde_json::json;
//!
//! let mut graph = Graph::new();
//! let a = json!({ "id": "a" });
//! let b = json!({ "id": "b" });
//! graph.put(a.clone()).unwrap();
//! graph.put(b.clone()).unwrap();
//! graph.create_edge(&a, &b).unwrap();
//!
//! assert_eq!(graph.get_outgoing(&a), vec![&b]);
//!
//! // dependencies come out before the vertices that point at them
//! let mut order = Vec::new();
//! graph.leaf_first_search(|vertex| order.push(vertex["id"].clone()));
//! assert_eq!(order, vec![json!("b"), json!("a")]);
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod hash;
pub mod persistent;

// Re-export main types for convenience
pub use config::{GraphConfig, HashFn, IdFn, SerializableFn, StripFn};
pub use graph::{
    DiffEvent, Graph, GraphError, GraphResult, HashSerializedGraph, SerializedGraph, Vertex,
    VertexHashedListener, VertexId, VertexStore,
};
pub use persistent::{PersistentConfig, PersistentGraph};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
