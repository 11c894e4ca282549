// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{MaxparError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = MaxparError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.engine))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_engine_section(cfg)?;
    Ok(())
}

fn validate_engine_section(cfg: &RawConfigFile) -> Result<()> {
    // failure_policy, conflict_rule and log_level are strongly typed and
    // rejected during deserialization.

    if cfg.engine.max_concurrency == Some(0) {
        return Err(MaxparError::ConfigError(
            "[engine].max_concurrency must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}
