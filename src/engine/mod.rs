// src/engine/mod.rs

//! Serialized access to a single [`Scheduler`](crate::scheduler::Scheduler).
//!
//! The scheduler is owned by one task that processes requests one at a
//! time from an mpsc channel, so mutations never interleave with each
//! other or with reads:
//! - the pure request → response state machine lives in [`core`];
//! - the async loop that feeds it lives in [`runtime`];
//! - callers talk to it through the cloneable [`SchedulerHandle`].

use std::collections::BTreeSet;

use crate::blocked::BlockedTask;
use crate::errors::ReadyworkError;
use crate::model::{
    Dependency, DependencyType, Origin, Task, TaskFilter, TaskId, TaskSpec, TaskUpdate,
};
use crate::ready::{ReadyFilter, ReadyWorkConfig, ReadyWorkItem};
use crate::scheduler::{ImportSummary, SchedulerStats, TaskDetail};
use crate::snapshot::SnapshotDocument;

/// Operations accepted by the runtime.
#[derive(Debug, Clone)]
pub enum Request {
    CreateTask {
        spec: TaskSpec,
        origin: Origin,
    },
    UpdateTask {
        id: TaskId,
        update: TaskUpdate,
    },
    GetTask {
        id: TaskId,
    },
    TaskDetail {
        id: TaskId,
    },
    ListTasks {
        filter: TaskFilter,
    },
    AddDependency {
        dependent: TaskId,
        blocker: TaskId,
        dependency_type: DependencyType,
        note: Option<String>,
    },
    RemoveDependency {
        dependent: TaskId,
        blocker: TaskId,
    },
    Blockers {
        id: TaskId,
    },
    ReadyWork {
        /// `None` uses the scheduler's configured defaults.
        config: Option<ReadyWorkConfig>,
        filter: ReadyFilter,
    },
    /// The ready-work defaults the scheduler was built with.
    ReadyConfig,
    BlockedTasks,
    BlockingCycles,
    BatchCreate {
        specs: Vec<TaskSpec>,
        origin: Origin,
        parent: Option<TaskId>,
    },
    Export,
    Import {
        doc: SnapshotDocument,
    },
    Stats,
    /// Stop the runtime after replying.
    Shutdown,
}

impl Request {
    /// Whether handling this request may change scheduler state.
    pub fn is_mutation(&self) -> bool {
        match self {
            Request::CreateTask { .. }
            | Request::UpdateTask { .. }
            | Request::AddDependency { .. }
            | Request::RemoveDependency { .. }
            | Request::BatchCreate { .. }
            | Request::Import { .. } => true,
            Request::GetTask { .. }
            | Request::TaskDetail { .. }
            | Request::ListTasks { .. }
            | Request::Blockers { .. }
            | Request::ReadyWork { .. }
            | Request::ReadyConfig
            | Request::BlockedTasks
            | Request::BlockingCycles
            | Request::Export
            | Request::Stats
            | Request::Shutdown => false,
        }
    }
}

/// Reply to a [`Request`].
#[derive(Debug)]
pub enum Response {
    Task(Task),
    Tasks(Vec<Task>),
    Detail(TaskDetail),
    Dependency(Dependency),
    Removed(bool),
    Blockers(BTreeSet<TaskId>),
    ReadyWork(Vec<ReadyWorkItem>),
    ReadyConfig(ReadyWorkConfig),
    Blocked(Vec<BlockedTask>),
    Cycles(Vec<Vec<TaskId>>),
    Snapshot(SnapshotDocument),
    Imported(ImportSummary),
    Stats(SchedulerStats),
    ShuttingDown,
    Failed(ReadyworkError),
}

pub mod core;
pub mod handle;
pub mod runtime;

pub use self::core::{CoreRuntime, CoreStep};
pub use handle::SchedulerHandle;
pub use runtime::{spawn, Envelope, Runtime, DEFAULT_CHANNEL_CAPACITY};
