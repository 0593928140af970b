//! Persistent graph
//!
//! The immutable counterpart of [`Graph`](crate::Graph): every mutating
//! operation returns a new graph value and never alters the receiver, so
//! any previously obtained value remains a valid, queryable snapshot. Built
//! on HAMT-backed persistent maps; unaffected branches are shared between
//! versions by reference instead of copied, which makes snapshots cheap to
//! keep and safe to hand out.
//!
//! Only vertex CRUD is defined for this variant. The adjacency maps are
//! carried through every operation as the extension point for a future
//! edge layer.

use crate::config::{self, IdFn};
use crate::graph::store::{GraphError, GraphResult};
use crate::graph::types::{Vertex, VertexId};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Configuration for a [`PersistentGraph`]: identity extraction only
#[derive(Clone)]
pub struct PersistentConfig {
    id_key: String,
    id_fn: Option<IdFn>,
}

impl Default for PersistentConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistentConfig {
    pub fn new() -> Self {
        PersistentConfig {
            id_key: "id".to_string(),
            id_fn: None,
        }
    }

    /// Property name the default identity function reads
    pub fn with_id_key(mut self, key: impl Into<String>) -> Self {
        self.id_key = key.into();
        self
    }

    /// Custom identity function; takes precedence over the id key
    pub fn with_id_fn(
        mut self,
        f: impl Fn(&Vertex) -> GraphResult<VertexId> + Send + Sync + 'static,
    ) -> Self {
        self.id_fn = Some(Arc::new(f));
        self
    }

    fn vertex_id(&self, vertex: &Vertex) -> GraphResult<VertexId> {
        match &self.id_fn {
            Some(id_fn) => id_fn(vertex),
            None => config::extract_id(vertex, &self.id_key),
        }
    }
}

impl fmt::Debug for PersistentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentConfig")
            .field("id_key", &self.id_key)
            .field("id_fn", &self.id_fn.is_some())
            .finish()
    }
}

/// Immutable directed graph; every mutation returns a new value
#[derive(Clone)]
pub struct PersistentGraph {
    config: Arc<PersistentConfig>,
    vertices: im::HashMap<VertexId, Vertex>,
    // reserved for a future edge layer; threaded through every operation
    outgoing: im::HashMap<VertexId, im::Vector<VertexId>>,
    incoming: im::HashMap<VertexId, im::Vector<VertexId>>,
}

impl Default for PersistentGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistentGraph {
    pub fn new() -> Self {
        Self::with_config(PersistentConfig::new())
    }

    pub fn with_config(config: PersistentConfig) -> Self {
        PersistentGraph {
            config: Arc::new(config),
            vertices: im::HashMap::new(),
            outgoing: im::HashMap::new(),
            incoming: im::HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn contains(&self, id: impl Into<VertexId>) -> bool {
        self.vertices.contains_key(&id.into())
    }

    /// Fetch a vertex by id in this snapshot
    pub fn get(&self, id: impl Into<VertexId>) -> Option<&Vertex> {
        self.vertices.get(&id.into())
    }

    /// New graph value with the vertex inserted. Overwrites any vertex
    /// already stored under the same identity; the receiver is unaffected.
    pub fn put(&self, vertex: Vertex) -> GraphResult<Self> {
        let id = self.config.vertex_id(&vertex)?;
        trace!(%id, "persistent put");
        Ok(self.with_vertices(self.vertices.update(id, vertex)))
    }

    /// New graph value with the vertex sharing this vertex's identity
    /// overwritten. Fails with [`GraphError::VertexNotFound`] when this
    /// snapshot has no such vertex.
    pub fn replace(&self, vertex: Vertex) -> GraphResult<Self> {
        let id = self.config.vertex_id(&vertex)?;
        if !self.vertices.contains_key(&id) {
            return Err(GraphError::VertexNotFound { id });
        }
        trace!(%id, "persistent replace");
        Ok(self.with_vertices(self.vertices.update(id, vertex)))
    }

    /// New graph value without the vertex sharing this vertex's identity.
    /// Fails with [`GraphError::VertexNotFound`] when this snapshot has no
    /// such vertex.
    pub fn remove(&self, vertex: &Vertex) -> GraphResult<Self> {
        let id = self.config.vertex_id(vertex)?;
        if !self.vertices.contains_key(&id) {
            return Err(GraphError::VertexNotFound { id });
        }
        trace!(%id, "persistent remove");
        Ok(self.with_vertices(self.vertices.without(&id)))
    }

    fn with_vertices(&self, vertices: im::HashMap<VertexId, Vertex>) -> Self {
        PersistentGraph {
            config: Arc::clone(&self.config),
            vertices,
            outgoing: self.outgoing.clone(),
            incoming: self.incoming.clone(),
        }
    }
}

impl fmt::Debug for PersistentGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentGraph")
            .field("config", &self.config)
            .field("vertices", &self.vertices.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_never_mutates_receiver() {
        let g0 = PersistentGraph::new();
        let g1 = g0.put(json!({ "id": "a", "v": 1 })).unwrap();

        assert!(g0.get("a").is_none());
        assert_eq!(g1.get("a"), Some(&json!({ "id": "a", "v": 1 })));
    }

    #[test]
    fn test_put_overwrites_without_duplicate_error() {
        let g0 = PersistentGraph::new();
        let g1 = g0.put(json!({ "id": "a", "v": 1 })).unwrap();
        let g2 = g1.put(json!({ "id": "a", "v": 2 })).unwrap();

        assert_eq!(g1.get("a"), Some(&json!({ "id": "a", "v": 1 })));
        assert_eq!(g2.get("a"), Some(&json!({ "id": "a", "v": 2 })));
        assert_eq!(g2.len(), 1);
    }

    #[test]
    fn test_missing_id_rejected() {
        let g0 = PersistentGraph::new();
        assert!(matches!(g0.put(json!({})), Err(GraphError::MissingId)));
    }

    #[test]
    fn test_snapshots_stay_valid_across_versions() {
        let g0 = PersistentGraph::new();
        let g1 = g0.put(json!({ "id": "a" })).unwrap();
        let g2 = g1.put(json!({ "id": "b" })).unwrap();
        let g3 = g2.remove(&json!({ "id": "a" })).unwrap();

        assert_eq!(g0.len(), 0);
        assert_eq!(g1.len(), 1);
        assert_eq!(g2.len(), 2);
        assert_eq!(g3.len(), 1);
        assert!(g3.get("a").is_none());
        assert!(g2.get("a").is_some());
    }
}
