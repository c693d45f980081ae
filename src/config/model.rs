// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{LogicInputsPolicy, ModelOptions};

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [model]
/// logic_inputs = "exact"
/// shared_outputs = false
///
/// [document]
/// path = "dag.json"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub model: ModelSection,

    #[serde(default)]
    pub document: DocumentSection,
}

/// `[model]` section: which structural checks the graph model enforces.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ModelSection {
    /// `"exact"` (default) or `"superset"`.
    ///
    /// - `"exact"`: a field's `dependendFieldIds` must equal its logic's
    ///   `inputFieldIds`.
    /// - `"superset"`: the logic may read additional inputs.
    #[serde(default)]
    pub logic_inputs: LogicInputsPolicy,

    /// Allow a field to be listed in several nodes' `outputFieldsIds`.
    #[serde(default)]
    pub shared_outputs: bool,
}

/// `[document]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSection {
    /// Document used by the CLI when no path is given on the command line.
    #[serde(default = "default_document_path")]
    pub path: PathBuf,
}

fn default_document_path() -> PathBuf {
    PathBuf::from("dag.json")
}

impl Default for DocumentSection {
    fn default() -> Self {
        Self {
            path: default_document_path(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::default`].
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub model: ModelSection,
    pub document: DocumentSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(model: ModelSection, document: DocumentSection) -> Self {
        Self { model, document }
    }

    /// Options to pass to [`GraphModel::load_with`](crate::dag::GraphModel::load_with).
    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            logic_inputs: self.model.logic_inputs,
            shared_outputs: self.model.shared_outputs,
        }
    }
}
