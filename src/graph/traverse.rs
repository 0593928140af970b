//! Leaf-first traversal
//!
//! Post-order over the outgoing-edge relation: a vertex is visited only
//! after everything reachable from it has been visited. Roots are taken in
//! vertex insertion order, neighbors in edge-insertion order.

use super::store::VertexStore;
use super::types::{Vertex, VertexId};
use std::collections::HashSet;

pub(crate) fn leaf_first(store: &VertexStore, visit: &mut dyn FnMut(&Vertex)) {
    let mut visited: HashSet<VertexId> = HashSet::with_capacity(store.len());
    for (id, _) in store.iter() {
        descend(store, id, &mut visited, visit);
    }
}

fn descend(
    store: &VertexStore,
    id: &VertexId,
    visited: &mut HashSet<VertexId>,
    visit: &mut dyn FnMut(&Vertex),
) {
    if visited.contains(id) {
        return;
    }
    // mark before descending: an edge cycling back into an in-progress
    // vertex is skipped instead of recursing forever
    visited.insert(id.clone());

    for target in store.outgoing_ids(id) {
        descend(store, target, visited, visit);
    }
    if let Some(vertex) = store.get(id) {
        visit(vertex);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn visit_order(store: &VertexStore) -> Vec<String> {
        let mut order = Vec::new();
        leaf_first(store, &mut |vertex| {
            order.push(vertex["id"].as_str().unwrap_or_default().to_string());
        });
        order
    }

    #[test]
    fn test_chain_is_visited_leaves_first() {
        let mut store = VertexStore::new();
        for name in ["a", "b", "c"] {
            store.insert(VertexId::new(name), json!({ "id": name }));
        }
        store.attach_edge(VertexId::new("a"), VertexId::new("b"));
        store.attach_edge(VertexId::new("b"), VertexId::new("c"));

        assert_eq!(visit_order(&store), ["c", "b", "a"]);
    }

    #[test]
    fn test_cycle_terminates_and_visits_each_once() {
        let mut store = VertexStore::new();
        for name in ["a", "b"] {
            store.insert(VertexId::new(name), json!({ "id": name }));
        }
        store.attach_edge(VertexId::new("a"), VertexId::new("b"));
        store.attach_edge(VertexId::new("b"), VertexId::new("a"));

        // a is in progress when the cycle returns to it, so b completes first
        assert_eq!(visit_order(&store), ["b", "a"]);
    }

    #[test]
    fn test_self_loop() {
        let mut store = VertexStore::new();
        store.insert(VertexId::new("a"), json!({ "id": "a" }));
        store.attach_edge(VertexId::new("a"), VertexId::new("a"));

        assert_eq!(visit_order(&store), ["a"]);
    }
}
