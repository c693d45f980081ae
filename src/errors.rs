// src/errors.rs

//! Crate-wide error types.
//!
//! [`ValidationError`] is the only feedback channel of the graph model:
//! every rejected load or mutation returns one of its variants and leaves the
//! model untouched. [`FieldDagError`] wraps it together with the IO, parsing
//! and configuration failures of the surrounding tooling.

use std::fmt;

use thiserror::Error;

/// The kind of entity an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Node,
    Field,
    Logic,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Node => f.write_str("node"),
            EntityKind::Field => f.write_str("field"),
            EntityKind::Logic => f.write_str("logic"),
        }
    }
}

/// Which of the two dependency graphs a cycle was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphKind {
    /// Node-level `preNodeIds` / `nextNodeIds` edges.
    Node,
    /// Field-level `dependendFieldIds` edges.
    Field,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKind::Node => f.write_str("node"),
            GraphKind::Field => f.write_str("field"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("{kind} '{referenced_by}' references unknown id '{id}'")]
    DanglingReference {
        kind: EntityKind,
        id: String,
        referenced_by: String,
    },

    #[error("cycle detected in {graph} graph: {}", .path.join(" -> "))]
    CycleDetected { graph: GraphKind, path: Vec<String> },

    #[error("inconsistent edges: {0}")]
    InconsistentEdges(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },
}

impl ValidationError {
    /// Ids forming the cycle, if this is a [`ValidationError::CycleDetected`].
    pub fn cycle_path(&self) -> Option<&[String]> {
        match self {
            ValidationError::CycleDetected { path, .. } => Some(path.as_slice()),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum FieldDagError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FieldDagError>;
