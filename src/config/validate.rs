// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{FieldDagError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::FieldDagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.model, raw.document))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    // logic_inputs is strongly typed and checked during deserialization.
    validate_document_section(cfg)?;
    Ok(())
}

fn validate_document_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.document.path.as_os_str().is_empty() {
        return Err(FieldDagError::ConfigError(
            "[document].path must not be empty".to_string(),
        ));
    }
    Ok(())
}
