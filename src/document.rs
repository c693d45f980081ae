// src/document.rs

//! Reading and writing graph documents as JSON.
//!
//! This only handles (de)serialization; structural validation happens in
//! [`GraphModel::load_with`]. Use [`load_model`] to do both in one go.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::dag::{DagDocument, GraphModel};
use crate::errors::Result;
use crate::types::ModelOptions;

/// Parse a document from a JSON string.
pub fn parse_document(json: &str) -> Result<DagDocument> {
    let doc: DagDocument = serde_json::from_str(json)?;
    Ok(doc)
}

/// Read a document from a JSON file.
pub fn read_document(path: impl AsRef<Path>) -> Result<DagDocument> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let doc = parse_document(&contents)?;

    debug!(
        path = %path.display(),
        nodes = doc.nodes.len(),
        fields = doc.fields.len(),
        logics = doc.logics.len(),
        "document read"
    );

    Ok(doc)
}

/// Pretty-printed JSON for a document.
pub fn to_json_string(doc: &DagDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

pub fn write_document(path: impl AsRef<Path>, doc: &DagDocument) -> Result<()> {
    let path = path.as_ref();
    let mut json = to_json_string(doc)?;
    json.push('\n');
    fs::write(path, json)?;
    debug!(path = %path.display(), "document written");
    Ok(())
}

/// Read a document and validate it into a [`GraphModel`].
pub fn load_model(path: impl AsRef<Path>, options: &ModelOptions) -> Result<GraphModel> {
    let doc = read_document(path)?;
    let model = GraphModel::load_with(doc, options)?;
    Ok(model)
}
