// src/dag/records.rs

//! Plain value records, as exchanged with the authoring surface.
//!
//! These are direct mappings of the JSON shape the editor produces:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "A", "label": "Load", "inputFieldsIds": [], "outputFieldsIds": ["x"],
//!       "preNodeIds": [], "nextNodeIds": ["B"] }
//!   ],
//!   "fields": [
//!     { "id": "x", "name": "X", "dependendFieldIds": [], "logic": "" }
//!   ],
//!   "logics": []
//! }
//! ```
//!
//! Records carry no behaviour; the [`GraphModel`](crate::dag::GraphModel)
//! owns every invariant.

use serde::{Deserialize, Serialize};

pub type NodeId = String;
pub type FieldId = String;

/// A unit of computation linked to predecessor/successor nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,

    #[serde(default)]
    pub label: String,

    /// Fields read by this node.
    #[serde(default)]
    pub input_fields_ids: Vec<FieldId>,

    /// Fields produced by this node.
    #[serde(default)]
    pub output_fields_ids: Vec<FieldId>,

    #[serde(default)]
    pub pre_node_ids: Vec<NodeId>,

    #[serde(default)]
    pub next_node_ids: Vec<NodeId>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            input_fields_ids: Vec::new(),
            output_fields_ids: Vec::new(),
            pre_node_ids: Vec::new(),
            next_node_ids: Vec::new(),
        }
    }
}

/// A named data value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,

    #[serde(default)]
    pub name: String,

    /// Fields this field's logic reads from.
    ///
    /// The wire spelling `dependendFieldIds` is kept as-is.
    #[serde(default, rename = "dependendFieldIds")]
    pub depends_on: Vec<FieldId>,

    /// Opaque expression text. Never parsed or evaluated here.
    #[serde(default)]
    pub logic: String,
}

impl Field {
    pub fn new(id: impl Into<FieldId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            depends_on: Vec::new(),
            logic: String::new(),
        }
    }
}

/// The declared input-to-output binding for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logic {
    pub output_field_id: FieldId,

    #[serde(default)]
    pub input_field_ids: Vec<FieldId>,

    #[serde(default)]
    pub description: String,
}

/// Serialized form of a whole graph: nodes plus the field and logic
/// collections they reference by id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DagDocument {
    /// Identity of the stored graph, carried through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub fields: Vec<Field>,

    #[serde(default)]
    pub logics: Vec<Logic>,
}
