//! Graph change events
//!
//! `DiffEvent` is the event surface of the structural diff. The serialized
//! form of each event is a single-key tagged record, e.g.
//! `{"vertexAdded": {...}}` or `{"metadataChanged": {"from": .., "to": ..}}`.

use super::types::Vertex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Listener invoked whenever a vertex content hash is computed.
/// Receives the hash and the vertex it was computed for.
pub type VertexHashedListener = Arc<dyn Fn(&str, &Vertex) + Send + Sync>;

/// One structural difference between two graph snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffEvent {
    /// Vertex present in the older snapshot but not in the newer one
    VertexRemoved(Vertex),

    /// Vertex present in the newer snapshot but not in the older one
    VertexAdded(Vertex),

    /// Vertex present in both snapshots with deep-unequal values
    VertexReplaced { from: Vertex, to: Vertex },

    /// Graph metadata differs between the snapshots
    MetadataChanged {
        from: Option<Value>,
        to: Option<Value>,
    },
}
