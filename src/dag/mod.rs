// src/dag/mod.rs

//! Node/field dependency graph.
//!
//! - [`records`] holds the plain serializable `Node` / `Field` / `Logic`
//!   records and the `DagDocument` that carries them.
//! - [`edges`] is the single node-level edge set with its predecessor and
//!   successor views.
//! - [`traversal`] has cycle detection and topological ordering over the
//!   shared adjacency type.
//! - [`validate`] runs the structural checks over raw records.
//! - [`model`] owns a validated graph and its mutating operations.

pub mod edges;
pub mod model;
pub mod records;
pub mod traversal;
pub mod validate;

pub use edges::EdgeSet;
pub use model::GraphModel;
pub use records::{DagDocument, Field, FieldId, Logic, Node, NodeId};
pub use traversal::{TopologicalOrder, find_cycle};
