//! Graph configuration
//!
//! Identity, hashing, stripping and serializability are per-instance
//! strategies supplied at construction. Defaults: identity reads the `id`
//! property, hashing is canonical-JSON SHA-1, no stripping, everything is
//! serializable.

use crate::graph::store::{GraphError, GraphResult};
use crate::graph::types::{Vertex, VertexId};
use crate::hash;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Identity extraction strategy
pub type IdFn = Arc<dyn Fn(&Vertex) -> GraphResult<VertexId> + Send + Sync>;
/// Vertex hashing strategy
pub type HashFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;
/// Transform applied to a vertex before hashing and serialization
pub type StripFn = Arc<dyn Fn(&Vertex) -> Vertex + Send + Sync>;
/// Predicate deciding whether a vertex appears in serializations
pub type SerializableFn = Arc<dyn Fn(&Vertex) -> bool + Send + Sync>;

/// Read an identity from a named property. Strings are used verbatim,
/// numbers use their decimal rendering; anything else is `MissingId`.
pub(crate) fn extract_id(vertex: &Vertex, key: &str) -> GraphResult<VertexId> {
    match vertex.get(key) {
        Some(Value::String(s)) => Ok(VertexId::new(s.clone())),
        Some(Value::Number(n)) => Ok(VertexId::new(n.to_string())),
        _ => Err(GraphError::MissingId),
    }
}

/// Strategy bundle for a mutable [`Graph`](crate::Graph)
#[derive(Clone)]
pub struct GraphConfig {
    id_key: String,
    id_fn: Option<IdFn>,
    hash_fn: HashFn,
    strip_fn: Option<StripFn>,
    serializable_fn: Option<SerializableFn>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphConfig {
    pub fn new() -> Self {
        GraphConfig {
            id_key: "id".to_string(),
            id_fn: None,
            hash_fn: Arc::new(hash::hash_value),
            strip_fn: None,
            serializable_fn: None,
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

    /// Override the vertex hashing function
    pub fn with_hash_fn(mut self, f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.hash_fn = Arc::new(f);
        self
    }

    /// Transform dropping fields excluded from hashing and serialization
    pub fn with_strip_fn(mut self, f: impl Fn(&Vertex) -> Vertex + Send + Sync + 'static) -> Self {
        self.strip_fn = Some(Arc::new(f));
        self
    }

    /// Predicate deciding which vertices appear in serializations
    pub fn with_serializable_fn(
        mut self,
        f: impl Fn(&Vertex) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.serializable_fn = Some(Arc::new(f));
        self
    }

    /// Determine the identity of a vertex
    pub fn vertex_id(&self, vertex: &Vertex) -> GraphResult<VertexId> {
        match &self.id_fn {
            Some(id_fn) => id_fn(vertex),
            None => extract_id(vertex, &self.id_key),
        }
    }

    /// Apply the strip transform; identity when none is configured
    pub fn strip(&self, vertex: &Vertex) -> Vertex {
        match &self.strip_fn {
            Some(strip_fn) => strip_fn(vertex),
            None => vertex.clone(),
        }
    }

    /// Content hash of a vertex: strip transform, then hash strategy
    pub fn hash(&self, vertex: &Vertex) -> String {
        (self.hash_fn)(&self.strip(vertex))
    }

    /// Hash strategy applied to an already-prepared value. Used for the
    /// whole-graph hash, which is never stripped.
    pub fn hash_raw(&self, value: &Value) -> String {
        (self.hash_fn)(value)
    }

    pub fn is_serializable(&self, vertex: &Vertex) -> bool {
        self.serializable_fn.as_ref().map_or(true, |f| f(vertex))
    }
}

impl fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphConfig")
            .field("id_key", &self.id_key)
            .field("id_fn", &self.id_fn.is_some())
            .field("strip_fn", &self.strip_fn.is_some())
            .field("serializable_fn", &self.serializable_fn.is_some())
            .finish()
    }
}
