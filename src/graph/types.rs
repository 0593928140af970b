//! Core type definitions for the graph engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// An application-supplied vertex value
///
/// Vertices are opaque JSON-like records; the engine only interprets them
/// through the configured identity, hash, strip and serializability
/// strategies.
pub type Vertex = serde_json::Value;

/// Unique identifier for a vertex
///
/// Extracted from the vertex value by the configured identity function.
/// String ids are used verbatim; numeric ids use their decimal rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct VertexId(String);

impl VertexId {
    pub fn new(id: impl Into<String>) -> Self {
        VertexId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VertexId {
    fn from(s: String) -> Self {
        VertexId(s)
    }
}

impl From<&str> for VertexId {
    fn from(s: &str) -> Self {
        VertexId(s.to_string())
    }
}

impl From<VertexId> for String {
    fn from(id: VertexId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let id = VertexId::new("a");
        assert_eq!(id.as_str(), "a");
        assert_eq!(format!("{}", id), "a");

        let id2: VertexId = "b".into();
        assert_eq!(id2.as_str(), "b");
        assert_ne!(id, id2);
    }

    #[test]
    fn test_vertex_id_serializes_as_plain_string() {
        let id = VertexId::new("a");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"a\"");
    }

    #[test]
    fn test_vertex_id_ordering() {
        assert!(VertexId::new("a") < VertexId::new("b"));
    }
}
