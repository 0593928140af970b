//! Identity-keyed vertex storage with adjacency maps
//!
//! Uses insertion-ordered maps so iteration, serialization and traversal
//! roots follow put order:
//! - vertices: VertexId -> Vertex
//! - outgoing: VertexId -> Vec<VertexId> (targets, edge-insertion order)
//! - incoming: VertexId -> Vec<VertexId> (sources, edge-insertion order)
//!
//! The two adjacency maps are kept as mutual inverses at all times, and
//! entries whose list becomes empty are pruned.

use super::types::{Vertex, VertexId};
use indexmap::IndexMap;
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The identity function could not determine an id for a vertex
    #[error("no id can be determined for vertex")]
    MissingId,

    /// `put` was called with an id already present in the graph
    #[error("vertex '{id}' already in graph")]
    DuplicateId { id: VertexId },

    /// An operation referenced an id not currently in the graph
    #[error("no vertex '{id}' in graph")]
    VertexNotFound { id: VertexId },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Vertex map plus derived adjacency views
#[derive(Debug, Clone, Default)]
pub struct VertexStore {
    vertices: IndexMap<VertexId, Vertex>,
    outgoing: IndexMap<VertexId, Vec<VertexId>>,
    incoming: IndexMap<VertexId, Vec<VertexId>>,
}

impl VertexStore {
    pub fn new() -> Self {
        VertexStore::default()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn contains(&self, id: &VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn get(&self, id: &VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// Insert a vertex under `id`. Callers check for duplicates first.
    pub fn insert(&mut self, id: VertexId, vertex: Vertex) {
        self.vertices.insert(id, vertex);
    }

    /// Overwrite the vertex stored under `id`, preserving its adjacency
    /// and its position in insertion order.
    pub fn overwrite(&mut self, id: &VertexId, vertex: Vertex) {
        if let Some(slot) = self.vertices.get_mut(id) {
            *slot = vertex;
        }
    }

    /// Remove the vertex under `id` together with every incident edge in
    /// both directions, pruning adjacency lists that become empty.
    pub fn remove(&mut self, id: &VertexId) -> Option<Vertex> {
        let vertex = self.vertices.shift_remove(id)?;

        if let Some(targets) = self.outgoing.shift_remove(id) {
            for target in targets {
                if let Some(sources) = self.incoming.get_mut(&target) {
                    sources.retain(|source| source != id);
                    if sources.is_empty() {
                        self.incoming.shift_remove(&target);
                    }
                }
            }
        }
        if let Some(sources) = self.incoming.shift_remove(id) {
            for source in sources {
                if let Some(targets) = self.outgoing.get_mut(&source) {
                    targets.retain(|target| target != id);
                    if targets.is_empty() {
                        self.outgoing.shift_remove(&source);
                    }
                }
            }
        }

        Some(vertex)
    }

    pub fn has_edge(&self, source: &VertexId, target: &VertexId) -> bool {
        self.outgoing
            .get(source)
            .is_some_and(|targets| targets.contains(target))
    }

    /// Record a source -> target edge in both adjacency views. Idempotent:
    /// re-attaching an existing edge changes nothing.
    pub fn attach_edge(&mut self, source: VertexId, target: VertexId) {
        if self.has_edge(&source, &target) {
            return;
        }
        self.outgoing
            .entry(source.clone())
            .or_default()
            .push(target.clone());
        self.incoming.entry(target).or_default().push(source);
    }

    /// Drop a source -> target edge from both adjacency views. No-op when
    /// the edge does not exist.
    pub fn detach_edge(&mut self, source: &VertexId, target: &VertexId) {
        if let Some(targets) = self.outgoing.get_mut(source) {
            targets.retain(|t| t != target);
            if targets.is_empty() {
                self.outgoing.shift_remove(source);
            }
        }
        if let Some(sources) = self.incoming.get_mut(target) {
            sources.retain(|s| s != source);
            if sources.is_empty() {
                self.incoming.shift_remove(target);
            }
        }
    }

    pub fn outgoing_ids(&self, id: &VertexId) -> &[VertexId] {
        self.outgoing.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn incoming_ids(&self, id: &VertexId) -> &[VertexId] {
        self.incoming.get(id).map_or(&[], Vec::as_slice)
    }

    /// Vertices in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&VertexId, &Vertex)> {
        self.vertices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(s: &str) -> VertexId {
        VertexId::new(s)
    }

    fn store_abc() -> VertexStore {
        let mut store = VertexStore::new();
        for name in ["a", "b", "c"] {
            store.insert(id(name), json!({ "id": name }));
        }
        store
    }

    #[test]
    fn test_attach_updates_both_views() {
        let mut store = store_abc();
        store.attach_edge(id("a"), id("b"));
        store.attach_edge(id("c"), id("b"));

        assert_eq!(store.outgoing_ids(&id("a")), [id("b")]);
        assert_eq!(store.incoming_ids(&id("b")), [id("a"), id("c")]);
        assert!(store.outgoing_ids(&id("b")).is_empty());
        assert!(store.has_edge(&id("a"), &id("b")));
        assert!(!store.has_edge(&id("b"), &id("a")));
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut store = store_abc();
        store.attach_edge(id("a"), id("b"));
        store.attach_edge(id("a"), id("b"));
        assert_eq!(store.outgoing_ids(&id("a")), [id("b")]);
        assert_eq!(store.incoming_ids(&id("b")), [id("a")]);
    }

    #[test]
    fn test_detach_prunes_empty_entries() {
        let mut store = store_abc();
        store.attach_edge(id("a"), id("b"));
        store.detach_edge(&id("a"), &id("b"));
        assert!(store.outgoing_ids(&id("a")).is_empty());
        assert!(store.incoming_ids(&id("b")).is_empty());

        // detaching a non-existent edge is a no-op
        store.detach_edge(&id("a"), &id("b"));
        assert!(!store.has_edge(&id("a"), &id("b")));
    }

    #[test]
    fn test_remove_detaches_incident_edges() {
        let mut store = store_abc();
        store.attach_edge(id("a"), id("b"));
        store.attach_edge(id("c"), id("b"));
        store.attach_edge(id("b"), id("c"));

        let removed = store.remove(&id("b")).unwrap();
        assert_eq!(removed, json!({ "id": "b" }));
        assert!(!store.contains(&id("b")));
        assert!(store.outgoing_ids(&id("a")).is_empty());
        assert!(store.outgoing_ids(&id("c")).is_empty());
        assert!(store.incoming_ids(&id("c")).is_empty());
    }

    #[test]
    fn test_overwrite_preserves_adjacency_and_order() {
        let mut store = store_abc();
        store.attach_edge(id("a"), id("b"));
        store.overwrite(&id("a"), json!({ "id": "a", "v": 2 }));

        assert_eq!(store.get(&id("a")), Some(&json!({ "id": "a", "v": 2 })));
        assert_eq!(store.outgoing_ids(&id("a")), [id("b")]);
        let order: Vec<&VertexId> = store.iter().map(|(i, _)| i).collect();
        assert_eq!(order, [&id("a"), &id("b"), &id("c")]);
    }
}
