// src/snapshot/document.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ReadyworkError, Result};
use crate::model::{Dependency, DependencyId, Task, TaskId};

/// Schema version written by this crate.
pub const SCHEMA_VERSION: &str = "1.0";

/// Complete, transferable copy of the scheduler state.
///
/// ```json
/// {
///   "tasks": { "task-1": { "id": "task-1", "title": "...", ... } },
///   "dependencies": { "dep-1": { "id": "dep-1", ... } },
///   "exported_at": "2024-01-01T00:00:00Z",
///   "schema_version": "1.0"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub tasks: BTreeMap<TaskId, Task>,
    #[serde(default)]
    pub dependencies: BTreeMap<DependencyId, Dependency>,
    pub exported_at: DateTime<Utc>,
    #[serde(alias = "version")]
    pub schema_version: String,
}

impl SnapshotDocument {
    pub fn new(
        tasks: impl IntoIterator<Item = Task>,
        dependencies: impl IntoIterator<Item = Dependency>,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tasks: tasks.into_iter().map(|t| (t.id.clone(), t)).collect(),
            dependencies: dependencies
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
            exported_at,
            schema_version: SCHEMA_VERSION.to_string(),
        }
    }

    /// Parse a document. Structural problems surface as `MalformedSnapshot`.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ReadyworkError::MalformedSnapshot(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
