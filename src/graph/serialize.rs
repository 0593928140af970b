//! Serialized graph snapshots
//!
//! Two interchange shapes:
//! - [`SerializedGraph`]: id-keyed, produced by `Graph::serialize`
//! - [`HashSerializedGraph`]: content-hash-keyed, produced by
//!   `Graph::hash_serialize` and consumed by
//!   `Graph::from_hash_serialization`
//!
//! Both keep insertion order and omit `metadata` when unset, so their JSON
//! encoding round-trips across processes.

use super::types::{Vertex, VertexId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Id-keyed snapshot of a graph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SerializedGraph {
    pub vertices: IndexMap<VertexId, Vertex>,
    pub edges: IndexMap<VertexId, Vec<VertexId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl SerializedGraph {
    /// The snapshot as a plain JSON value. This is the input to the
    /// whole-graph hash.
    pub fn to_value(&self) -> Value {
        let vertices: Map<String, Value> = self
            .vertices
            .iter()
            .map(|(id, vertex)| (id.to_string(), vertex.clone()))
            .collect();
        let edges: Map<String, Value> = self
            .edges
            .iter()
            .map(|(id, targets)| {
                let targets = targets
                    .iter()
                    .map(|t| Value::String(t.to_string()))
                    .collect();
                (id.to_string(), Value::Array(targets))
            })
            .collect();

        let mut out = Map::new();
        out.insert("vertices".to_string(), Value::Object(vertices));
        out.insert("edges".to_string(), Value::Object(edges));
        if let Some(metadata) = &self.metadata {
            out.insert("metadata".to_string(), metadata.clone());
        }
        Value::Object(out)
    }
}

/// Content-hash-keyed snapshot of a graph
///
/// `vertices` lists the hashes of the serializable vertex set in insertion
/// order; `edges` maps a source hash to its target hashes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HashSerializedGraph {
    pub vertices: Vec<String>,
    pub edges: IndexMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_omitted_when_unset() {
        let snapshot = SerializedGraph::default();
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({ "vertices": {}, "edges": {} })
        );
        assert_eq!(snapshot.to_value(), json!({ "vertices": {}, "edges": {} }));
    }

    #[test]
    fn test_to_value_matches_serde_encoding() {
        let mut snapshot = SerializedGraph::default();
        snapshot
            .vertices
            .insert(VertexId::new("a"), json!({ "id": "a" }));
        snapshot
            .edges
            .insert(VertexId::new("a"), vec![VertexId::new("b")]);
        snapshot.metadata = Some(json!({ "rev": 3 }));

        assert_eq!(
            snapshot.to_value(),
            serde_json::to_value(&snapshot).unwrap()
        );
    }

    #[test]
    fn test_hash_serialized_round_trips_through_json() {
        let encoded = json!({
            "vertices": ["_a", "_b"],
            "edges": { "_a": ["_b"] },
            "metadata": { "foo": "bar" }
        });
        let decoded: HashSerializedGraph = serde_json::from_value(encoded.clone()).unwrap();
        assert_eq!(decoded.vertices, ["_a", "_b"]);
        assert_eq!(serde_json::to_value(&decoded).unwrap(), encoded);
    }
}
