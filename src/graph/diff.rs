//! Structural diff between two graph snapshots
//!
//! Event order is fixed: removals and replacements first (iterating the
//! older snapshot in insertion order), then additions (iterating the newer
//! snapshot in insertion order), then a metadata change if any. Vertex
//! equality is deep structural equality.

use super::event::DiffEvent;
use super::store::VertexStore;
use serde_json::Value;

pub(crate) fn emit_diff(
    current: &VertexStore,
    current_meta: Option<&Value>,
    previous: &VertexStore,
    previous_meta: Option<&Value>,
    listener: &mut dyn FnMut(DiffEvent),
) {
    for (id, previous_vertex) in previous.iter() {
        match current.get(id) {
            None => listener(DiffEvent::VertexRemoved(previous_vertex.clone())),
            Some(current_vertex) if current_vertex != previous_vertex => {
                listener(DiffEvent::VertexReplaced {
                    from: previous_vertex.clone(),
                    to: current_vertex.clone(),
                })
            }
            Some(_) => {}
        }
    }

    for (id, current_vertex) in current.iter() {
        if previous.get(id).is_none() {
            listener(DiffEvent::VertexAdded(current_vertex.clone()));
        }
    }

    if current_meta != previous_meta {
        listener(DiffEvent::MetadataChanged {
            from: previous_meta.cloned(),
            to: current_meta.cloned(),
        });
    }
}
