// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::ready::ReadyWorkConfig;
use crate::store::StoreOptions;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [store]
/// id_prefix = "task"
/// max_title_len = 200
///
/// [ready]
/// max_items = 20
/// boost_threshold_hours = 24
/// sort_strategy = "hybrid"
///
/// [snapshot]
/// path = ".readywork/state.json"
/// ```
///
/// All sections are optional and have reasonable defaults. This raw form
/// has not been validated; convert it into a [`ConfigFile`] with
/// `ConfigFile::try_from`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub ready: ReadyWorkConfig,

    #[serde(default)]
    pub snapshot: SnapshotSection,
}

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// Prefix for minted task ids (`<prefix>-<n>`).
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    #[serde(default = "default_max_title_len")]
    pub max_title_len: usize,
}

fn default_id_prefix() -> String {
    StoreOptions::DEFAULT_PREFIX.to_string()
}

fn default_max_title_len() -> usize {
    StoreOptions::DEFAULT_MAX_TITLE_LEN
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            max_title_len: default_max_title_len(),
        }
    }
}

/// `[snapshot]` section: where the CLI keeps its state between runs.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotSection {
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(".readywork/state.json")
}

impl Default for SnapshotSection {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
        }
    }
}

/// Validated configuration. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)` or `ConfigFile::default()`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub store: StoreSection,
    pub ready: ReadyWorkConfig,
    pub snapshot: SnapshotSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        store: StoreSection,
        ready: ReadyWorkConfig,
        snapshot: SnapshotSection,
    ) -> Self {
        Self {
            store,
            ready,
            snapshot,
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            id_prefix: self.store.id_prefix.clone(),
            max_title_len: self.store.max_title_len,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let raw = RawConfigFile::default();
        Self::new_unchecked(raw.store, raw.ready, raw.snapshot)
    }
}
