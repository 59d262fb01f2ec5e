// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::fmt;

use thiserror::Error;

use crate::model::TaskId;

/// Why a dependency could not be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The dependent task id does not exist.
    UnknownDependent,
    /// The blocking task id does not exist.
    UnknownBlocker,
    /// Dependent and blocker are the same task.
    SelfLoop,
    /// An edge with the same endpoints and type already exists.
    Duplicate,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectReason::UnknownDependent => "dependent task does not exist",
            RejectReason::UnknownBlocker => "blocking task does not exist",
            RejectReason::SelfLoop => "a task cannot depend on itself",
            RejectReason::Duplicate => "an identical dependency already exists",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum ReadyworkError {
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("Dependency rejected: {0}")]
    Rejected(RejectReason),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Scheduler runtime is no longer running")]
    RuntimeClosed,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ReadyworkError>;
