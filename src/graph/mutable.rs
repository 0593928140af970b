//! Mutable graph
//!
//! Identity-based CRUD, edges, serialization, content hashing, structural
//! diff and leaf-first traversal over a [`VertexStore`]. Mutation is in
//! place; every operation either completes or fails without partial effect.

use super::diff;
use super::event::{DiffEvent, VertexHashedListener};
use super::serialize::{HashSerializedGraph, SerializedGraph};
use super::store::{GraphError, GraphResult, VertexStore};
use super::traverse;
use super::types::{Vertex, VertexId};
use crate::config::GraphConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Mutable directed graph over application-defined vertex values
///
/// Cloning yields an independent graph: the stores are copied, while the
/// configuration and registered listeners are shared by reference.
#[derive(Clone)]
pub struct Graph {
    config: Arc<GraphConfig>,
    store: VertexStore,
    metadata: Option<Value>,
    /// id -> content hash of the value currently stored under that id
    hash_cache: HashMap<VertexId, String>,
    /// memoized whole-graph hash, dropped on every structural mutation
    graph_hash: Option<String>,
    listeners: Vec<VertexHashedListener>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Graph with the default configuration (identity by `id` property,
    /// canonical SHA-1 hashing, no stripping or filtering)
    pub fn new() -> Self {
        Self::with_config(GraphConfig::new())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Graph {
            config: Arc::new(config),
            store: VertexStore::new(),
            metadata: None,
            hash_cache: HashMap::new(),
            graph_hash: None,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for vertex hash computations. Listeners fire
    /// synchronously, in registration order, once per computed hash.
    pub fn on_vertex_hashed(&mut self, listener: impl Fn(&str, &Vertex) + Send + Sync + 'static) {
        self.listeners.push(Arc::new(listener));
    }

    /// Number of vertices currently in the graph
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Insert a new vertex. Fails with [`GraphError::DuplicateId`] when a
    /// vertex with the same identity is already present.
    pub fn put(&mut self, vertex: Vertex) -> GraphResult<()> {
        let id = self.config.vertex_id(&vertex)?;
        if self.store.contains(&id) {
            return Err(GraphError::DuplicateId { id });
        }
        debug!(%id, "put vertex");
        self.refresh_hash(&id, &vertex);
        self.store.insert(id, vertex);
        self.graph_hash = None;
        Ok(())
    }

    /// Fetch a vertex by id
    pub fn get(&self, id: impl Into<VertexId>) -> Option<&Vertex> {
        self.store.get(&id.into())
    }

    /// Overwrite the vertex sharing this vertex's identity, preserving its
    /// adjacency. Fails with [`GraphError::VertexNotFound`] when absent.
    pub fn replace(&mut self, vertex: Vertex) -> GraphResult<()> {
        let id = self.config.vertex_id(&vertex)?;
        if !self.store.contains(&id) {
            return Err(GraphError::VertexNotFound { id });
        }
        debug!(%id, "replace vertex");
        self.refresh_hash(&id, &vertex);
        self.store.overwrite(&id, vertex);
        self.graph_hash = None;
        Ok(())
    }

    /// Remove the vertex sharing this vertex's identity together with all
    /// its incident edges. Returns the removed value.
    pub fn remove(&mut self, vertex: &Vertex) -> GraphResult<Vertex> {
        let id = self.config.vertex_id(vertex)?;
        match self.store.remove(&id) {
            Some(removed) => {
                debug!(%id, "remove vertex");
                self.hash_cache.remove(&id);
                self.graph_hash = None;
                Ok(removed)
            }
            None => Err(GraphError::VertexNotFound { id }),
        }
    }

    /// Create a directed edge between two vertices already in the graph.
    /// Idempotent: re-creating an existing edge changes nothing.
    pub fn create_edge(&mut self, source: &Vertex, target: &Vertex) -> GraphResult<()> {
        let source_id = self.config.vertex_id(source)?;
        let target_id = self.config.vertex_id(target)?;
        if !self.store.contains(&source_id) {
            return Err(GraphError::VertexNotFound { id: source_id });
        }
        if !self.store.contains(&target_id) {
            return Err(GraphError::VertexNotFound { id: target_id });
        }
        trace!(source = %source_id, target = %target_id, "create edge");
        self.store.attach_edge(source_id, target_id);
        self.graph_hash = None;
        Ok(())
    }

    /// Remove a directed edge. Removing a non-existent edge is a no-op.
    pub fn remove_edge(&mut self, source: &Vertex, target: &Vertex) -> GraphResult<()> {
        let source_id = self.config.vertex_id(source)?;
        let target_id = self.config.vertex_id(target)?;
        trace!(source = %source_id, target = %target_id, "remove edge");
        self.store.detach_edge(&source_id, &target_id);
        self.graph_hash = None;
        Ok(())
    }

    /// Resolved targets of this vertex's outgoing edges, in edge-insertion
    /// order. Empty when the vertex has no edges or no identity.
    pub fn get_outgoing(&self, vertex: &Vertex) -> Vec<&Vertex> {
        self.neighbors(vertex, Direction::Outgoing)
    }

    /// Resolved sources of this vertex's incoming edges, in edge-insertion
    /// order.
    pub fn get_incoming(&self, vertex: &Vertex) -> Vec<&Vertex> {
        self.neighbors(vertex, Direction::Incoming)
    }

    fn neighbors(&self, vertex: &Vertex, direction: Direction) -> Vec<&Vertex> {
        let Ok(id) = self.config.vertex_id(vertex) else {
            return Vec::new();
        };
        let ids = match direction {
            Direction::Outgoing => self.store.outgoing_ids(&id),
            Direction::Incoming => self.store.incoming_ids(&id),
        };
        ids.iter().filter_map(|n| self.store.get(n)).collect()
    }

    /// First vertex (in insertion order) whose named property equals the
    /// given value
    pub fn get_by_property(&self, key: &str, value: &Value) -> Option<&Vertex> {
        self.store
            .iter()
            .map(|(_, vertex)| vertex)
            .find(|vertex| vertex.get(key) == Some(value))
    }

    /// Attach an arbitrary metadata value to the whole graph
    pub fn set_metadata(&mut self, metadata: Value) {
        self.metadata = Some(metadata);
        self.graph_hash = None;
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    /// Id-keyed snapshot: stripped vertices passing the serializability
    /// predicate, edges whose endpoints are both included, metadata.
    pub fn serialize(&self) -> SerializedGraph {
        let mut snapshot = SerializedGraph {
            metadata: self.metadata.clone(),
            ..SerializedGraph::default()
        };
        for (id, vertex) in self.store.iter() {
            if self.config.is_serializable(vertex) {
                snapshot.vertices.insert(id.clone(), self.config.strip(vertex));
            }
        }
        for (source, _) in self.store.iter() {
            if !snapshot.vertices.contains_key(source) {
                continue;
            }
            let targets: Vec<VertexId> = self
                .store
                .outgoing_ids(source)
                .iter()
                .filter(|target| snapshot.vertices.contains_key(*target))
                .cloned()
                .collect();
            if !targets.is_empty() {
                snapshot.edges.insert(source.clone(), targets);
            }
        }
        snapshot
    }

    /// Hash-keyed snapshot over the serializable vertex set, hashes in
    /// vertex insertion order
    pub fn hash_serialize(&self) -> HashSerializedGraph {
        let mut hashes_by_id: HashMap<&VertexId, &str> = HashMap::new();
        let mut snapshot = HashSerializedGraph {
            metadata: self.metadata.clone(),
            ..HashSerializedGraph::default()
        };
        for (id, vertex) in self.store.iter() {
            if !self.config.is_serializable(vertex) {
                continue;
            }
            let hash = self.vertex_hash(id);
            hashes_by_id.insert(id, hash);
            snapshot.vertices.push(hash.to_string());
        }
        for (source, _) in self.store.iter() {
            let Some(source_hash) = hashes_by_id.get(source) else {
                continue;
            };
            let targets: Vec<String> = self
                .store
                .outgoing_ids(source)
                .iter()
                .filter_map(|target| hashes_by_id.get(target).map(|h| h.to_string()))
                .collect();
            if !targets.is_empty() {
                snapshot.edges.insert(source_hash.to_string(), targets);
            }
        }
        snapshot
    }

    /// Rebuild this graph from a hash-keyed snapshot plus a table mapping
    /// each hash back to its vertex. The rebuilt graph's [`serialize`]
    /// reproduces the snapshot the hashes were derived from.
    ///
    /// [`serialize`]: Graph::serialize
    pub fn from_hash_serialization(
        &mut self,
        hashed: &HashSerializedGraph,
        hashes_to_vertices: &HashMap<String, Vertex>,
    ) -> GraphResult<()> {
        let resolve = |hash: &String| {
            hashes_to_vertices
                .get(hash)
                .ok_or_else(|| GraphError::VertexNotFound {
                    id: VertexId::new(hash.clone()),
                })
        };

        for hash in &hashed.vertices {
            self.put(resolve(hash)?.clone())?;
        }
        for (source_hash, target_hashes) in &hashed.edges {
            let source = resolve(source_hash)?;
            for target_hash in target_hashes {
                self.create_edge(source, resolve(target_hash)?)?;
            }
        }
        if let Some(metadata) = &hashed.metadata {
            self.set_metadata(metadata.clone());
        }
        Ok(())
    }

    /// Whole-graph hash: the hash strategy applied to the serialized
    /// snapshot. Memoized until the next structural mutation.
    pub fn get_hash(&mut self) -> String {
        if let Some(hash) = &self.graph_hash {
            return hash.clone();
        }
        let hash = self.config.hash_raw(&self.serialize().to_value());
        self.graph_hash = Some(hash.clone());
        hash
    }

    /// Emit the structural difference from `other` (the older snapshot) to
    /// `self` (the newer one): removals and replacements first, then
    /// additions, then a metadata change.
    pub fn diff_from(&self, other: &Graph, mut listener: impl FnMut(DiffEvent)) {
        diff::emit_diff(
            &self.store,
            self.metadata.as_ref(),
            &other.store,
            other.metadata.as_ref(),
            &mut listener,
        );
    }

    /// Visit every vertex exactly once, each strictly after everything
    /// reachable over its outgoing edges (cycle-guarded post-order).
    pub fn leaf_first_search(&self, mut visit: impl FnMut(&Vertex)) {
        traverse::leaf_first(&self.store, &mut visit);
    }

    /// Compute, cache and announce the content hash for a vertex value
    fn refresh_hash(&mut self, id: &VertexId, vertex: &Vertex) {
        let hash = self.config.hash(vertex);
        trace!(%id, %hash, "vertex hashed");
        for listener in &self.listeners {
            listener(&hash, vertex);
        }
        self.hash_cache.insert(id.clone(), hash);
    }

    /// Content hash of a vertex currently in the graph, served from the
    /// cache maintained by `put`/`replace`
    fn vertex_hash(&self, id: &VertexId) -> &str {
        // the cache is populated whenever a vertex enters the graph, so a
        // contained id always has an entry
        self.hash_cache.get(id).map_or("", String::as_str)
    }
}

enum Direction {
    Outgoing,
    Incoming,
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("config", &self.config)
            .field("vertices", &self.store.len())
            .field("metadata", &self.metadata)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_duplicate_edge_is_idempotent() {
        let mut graph = Graph::new();
        let a = json!({ "id": "a" });
        let b = json!({ "id": "b" });
        graph.put(a.clone()).unwrap();
        graph.put(b.clone()).unwrap();

        graph.create_edge(&a, &b).unwrap();
        graph.create_edge(&a, &b).unwrap();

        assert_eq!(graph.get_outgoing(&a), vec![&b]);
        assert_eq!(graph.get_incoming(&b), vec![&a]);
    }

    #[test]
    fn test_graph_hash_is_memoized_until_mutation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut graph = Graph::with_config(GraphConfig::new().with_hash_fn(move |value| {
            counter.fetch_add(1, Ordering::SeqCst);
            value.to_string()
        }));

        graph.put(json!({ "id": "a" })).unwrap();
        let baseline = calls.load(Ordering::SeqCst); // put hashed the vertex

        let first = graph.get_hash();
        assert_eq!(graph.get_hash(), first);
        assert_eq!(calls.load(Ordering::SeqCst), baseline + 1);

        graph.set_metadata(json!("m"));
        let second = graph.get_hash();
        assert_ne!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), baseline + 2);
    }

    #[test]
    fn test_failed_operations_leave_graph_unchanged() {
        let mut graph = Graph::new();
        let a = json!({ "id": "a" });
        graph.put(a.clone()).unwrap();
        let before = graph.serialize();

        assert!(graph.put(a.clone()).is_err());
        assert!(graph.replace(json!({ "id": "x" })).is_err());
        assert!(graph.remove(&json!({ "id": "x" })).is_err());
        assert!(graph.create_edge(&a, &json!({ "id": "x" })).is_err());

        assert_eq!(graph.serialize(), before);
    }

    #[test]
    fn test_getters_never_fail_on_idless_vertices() {
        let graph = Graph::new();
        assert!(graph.get_outgoing(&json!({})).is_empty());
        assert!(graph.get_incoming(&json!({})).is_empty());
        assert!(graph.get("missing").is_none());
        assert!(graph.get_by_property("name", &json!("x")).is_none());
    }
}
