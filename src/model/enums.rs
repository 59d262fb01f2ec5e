// src/model/enums.rs

//! Closed enums for task status, priority, type and dependency type.
//!
//! Every enum serializes to the same lowercase names the CLI accepts (via
//! `clap::ValueEnum`), and every scheduling decision that depends on one of them is an exhaustive
//! `match`, so adding a variant is a compile error at each call site.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Blocked,
    Completed,
    Cancelled,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Open
    }
}

impl TaskStatus {
    /// Terminal tasks never show up as ready or blocked work.
    pub const fn is_terminal(self) -> bool {
        match self {
            TaskStatus::Completed | TaskStatus::Cancelled => true,
            TaskStatus::Open | TaskStatus::InProgress | TaskStatus::Blocked => false,
        }
    }

    /// Whether a blocker in this status has released its dependents.
    ///
    /// Only `Completed` releases. A cancelled blocker keeps blocking until
    /// the edge is removed explicitly.
    pub const fn releases_dependents(self) -> bool {
        match self {
            TaskStatus::Completed => true,
            TaskStatus::Open
            | TaskStatus::InProgress
            | TaskStatus::Blocked
            | TaskStatus::Cancelled => false,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a task. Lower numeric value means more urgent.
///
/// Serialized as its integer value (`0` = critical .. `4` = backlog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskPriority {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
    Backlog = 4,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl TaskPriority {
    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Critical => "critical",
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
            TaskPriority::Backlog => "backlog",
        }
    }
}

impl TryFrom<u8> for TaskPriority {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(TaskPriority::Critical),
            1 => Ok(TaskPriority::High),
            2 => Ok(TaskPriority::Medium),
            3 => Ok(TaskPriority::Low),
            4 => Ok(TaskPriority::Backlog),
            other => Err(format!("invalid task priority: {other} (expected 0..=4)")),
        }
    }
}

impl From<TaskPriority> for u8 {
    fn from(p: TaskPriority) -> Self {
        p.value()
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{} ({})", self.value(), self.as_str())
    }
}

/// Accepts `2`, `p2`, `P2` or `medium`.
impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase();
        let digits = norm.strip_prefix('p').unwrap_or(&norm);
        if let Ok(v) = digits.parse::<u8>() {
            return TaskPriority::try_from(v);
        }
        match norm.as_str() {
            "critical" => Ok(TaskPriority::Critical),
            "high" => Ok(TaskPriority::High),
            "medium" => Ok(TaskPriority::Medium),
            "low" => Ok(TaskPriority::Low),
            "backlog" => Ok(TaskPriority::Backlog),
            _ => Err(format!("invalid task priority: {s}")),
        }
    }
}

/// Kind of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum TaskType {
    Bug,
    Feature,
    Task,
    Epic,
    Chore,
    ContentReview,
    QuestionValidation,
    DomainUpdate,
}

impl Default for TaskType {
    fn default() -> Self {
        TaskType::Task
    }
}

impl TaskType {
    /// Score adjustment applied when ranking ready work.
    pub const fn score_boost(self) -> f64 {
        match self {
            TaskType::Bug => 3.0,
            TaskType::DomainUpdate => 2.5,
            TaskType::ContentReview => 2.0,
            TaskType::Feature => 1.0,
            TaskType::Task => 0.0,
            TaskType::Chore => -1.0,
            TaskType::Epic | TaskType::QuestionValidation => 0.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TaskType::Bug => "bug",
            TaskType::Feature => "feature",
            TaskType::Task => "task",
            TaskType::Epic => "epic",
            TaskType::Chore => "chore",
            TaskType::ContentReview => "content_review",
            TaskType::QuestionValidation => "question_validation",
            TaskType::DomainUpdate => "domain_update",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship carried by a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyType {
    /// Hard blocker; the only type that affects readiness.
    Blocks,
    Related,
    ParentChild,
    /// Provenance: the dependent was discovered while working on the blocker.
    DiscoveredFrom,
}

impl Default for DependencyType {
    fn default() -> Self {
        DependencyType::Blocks
    }
}

impl DependencyType {
    pub const fn affects_readiness(self) -> bool {
        match self {
            DependencyType::Blocks => true,
            DependencyType::Related
            | DependencyType::ParentChild
            | DependencyType::DiscoveredFrom => false,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DependencyType::Blocks => "blocks",
            DependencyType::Related => "related",
            DependencyType::ParentChild => "parent-child",
            DependencyType::DiscoveredFrom => "discovered-from",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
