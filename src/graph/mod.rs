//! Directed-graph engine core
//!
//! This module implements the mutable graph variant:
//! - identity-keyed vertex storage with inverse adjacency views
//! - identity-based CRUD and edge operations
//! - id-keyed and content-hash-keyed serialization
//! - structural diff with ordered events
//! - cycle-safe leaf-first traversal

pub mod event;
pub mod mutable;
pub mod serialize;
pub mod store;
pub mod types;

mod diff;
mod traverse;

// Re-export main types
pub use event::{DiffEvent, VertexHashedListener};
pub use mutable::Graph;
pub use serialize::{HashSerializedGraph, SerializedGraph};
pub use store::{GraphError, GraphResult, VertexStore};
pub use types::{Vertex, VertexId};
