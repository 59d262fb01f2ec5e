// src/model/task.rs

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::enums::{TaskPriority, TaskStatus, TaskType};

/// Canonical task identifier type (`<prefix>-<n>`).
pub type TaskId = String;

/// Caller-supplied metadata attached to a task.
pub type Context = BTreeMap<String, serde_json::Value>;

/// Title used for batch entries that arrive without one.
pub const DEFAULT_BATCH_TITLE: &str = "Discovered Task";

/// Source recorded when the caller does not name one.
pub const DEFAULT_SOURCE: &str = "agent";

/// A unit of trackable work.
///
/// Invariants maintained by the task store:
/// - `completed_at.is_some()` iff `status == Completed`
/// - `updated_at >= created_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub external_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub context: Context,
}

impl Task {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_batch_title() -> String {
    DEFAULT_BATCH_TITLE.to_string()
}

/// Everything needed to create one task, minus the fields the store assigns.
///
/// Deserializable so batch intake can read specs straight from JSON; a
/// missing title falls back to [`DEFAULT_BATCH_TITLE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    #[serde(default = "default_batch_title")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub external_ref: Option<String>,
    #[serde(default)]
    pub context: Context,
}

impl TaskSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: TaskPriority::default(),
            task_type: TaskType::default(),
            assignee: None,
            labels: Vec::new(),
            category: None,
            external_ref: None,
            context: Context::new(),
        }
    }
}

impl Default for TaskSpec {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_TITLE)
    }
}

/// Who created a task and in which working session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub source: String,
    pub session_id: Option<String>,
}

impl Origin {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

impl Default for Origin {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE)
    }
}

/// Partial update of a task. `None` fields are left untouched.
///
/// `labels` replaces the label set; `context` is merged key by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<String>,
    pub labels: Option<Vec<String>>,
    pub context: Option<Context>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.labels.is_none()
            && self.context.is_none()
    }
}

/// Filters for listing tasks. All set filters must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<String>,
    pub category: Option<String>,
    pub task_type: Option<TaskType>,
    pub limit: usize,
}

impl TaskFilter {
    pub const DEFAULT_LIMIT: usize = 50;

    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|s| task.status == s)
            && self.priority.is_none_or(|p| task.priority == p)
            && self.task_type.is_none_or(|t| task.task_type == t)
            && self
                .assignee
                .as_deref()
                .is_none_or(|a| task.assignee.as_deref() == Some(a))
            && self
                .category
                .as_deref()
                .is_none_or(|c| task.category.as_deref() == Some(c))
    }
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            assignee: None,
            category: None,
            task_type: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
