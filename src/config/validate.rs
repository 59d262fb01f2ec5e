// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ReadyworkError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ReadyworkError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.store, raw.ready, raw.snapshot))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_store(cfg)?;
    validate_ready(cfg)?;
    validate_snapshot_section(cfg)?;
    Ok(())
}

fn validate_store(cfg: &RawConfigFile) -> Result<()> {
    let prefix = &cfg.store.id_prefix;
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ReadyworkError::ConfigError(format!(
            "[store].id_prefix must be non-empty and contain only ASCII letters, digits or '_' (got {prefix:?})"
        )));
    }
    if cfg.store.max_title_len == 0 {
        return Err(ReadyworkError::ConfigError(
            "[store].max_title_len must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_ready(cfg: &RawConfigFile) -> Result<()> {
    // sort_strategy is strongly typed and validated during deserialization.

    if cfg.ready.max_items == 0 {
        return Err(ReadyworkError::ConfigError(
            "[ready].max_items must be >= 1 (got 0)".to_string(),
        ));
    }
    let threshold = cfg.ready.boost_threshold_hours;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(ReadyworkError::ConfigError(format!(
            "[ready].boost_threshold_hours must be a positive number (got {threshold})"
        )));
    }
    Ok(())
}

fn validate_snapshot_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.snapshot.path.as_os_str().is_empty() {
        return Err(ReadyworkError::ConfigError(
            "[snapshot].path must not be empty".to_string(),
        ));
    }
    Ok(())
}
