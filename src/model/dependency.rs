// src/model/dependency.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::enums::DependencyType;
use crate::model::task::TaskId;

pub type DependencyId = String;

/// A directed, typed edge: `dependent_id` depends on `blocker_id`.
///
/// Edges are never edited in place; they are added and removed whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: DependencyId,
    pub dependent_id: TaskId,
    pub blocker_id: TaskId,
    #[serde(default)]
    pub dependency_type: DependencyType,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Dependency {
    /// True if this edge goes from `dependent` to `blocker`, whatever its type.
    pub fn connects(&self, dependent: &str, blocker: &str) -> bool {
        self.dependent_id == dependent && self.blocker_id == blocker
    }

    pub fn touches(&self, task: &str) -> bool {
        self.dependent_id == task || self.blocker_id == task
    }
}
