use clap::ValueEnum;
use serde::Deserialize;

/// How a field's declared dependencies must relate to the inputs of the
/// logic binding that produces it.
///
/// - `Exact`: `dependendFieldIds` and `inputFieldIds` are the same set
///   (default behaviour).
/// - `Superset`: the logic may read more inputs than the field declares, but
///   every declared dependency must be among them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogicInputsPolicy {
    #[default]
    Exact,
    Superset,
}

/// Options that tune which structural checks the graph model enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelOptions {
    pub logic_inputs: LogicInputsPolicy,
    /// Allow the same field to appear in several nodes' `outputFieldsIds`.
    pub shared_outputs: bool,
}
