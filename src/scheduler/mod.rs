// src/scheduler/mod.rs

//! The scheduler: one value that owns the task store and the dependency
//! graph and exposes every operation callers need.
//!
//! There is no global instance. Construct one at startup and pass it
//! around, or hand it to [`crate::engine::Runtime`] to share it between
//! concurrent callers.

pub mod batch;
pub mod stats;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::blocked::{self, BlockedTask};
use crate::clock::{Clock, SystemClock};
use crate::config::ConfigFile;
use crate::dag::{self, BlockingView, DependencyGraph};
use crate::errors::Result;
use crate::model::{
    Dependency, DependencyType, Origin, Task, TaskFilter, TaskId, TaskSpec, TaskUpdate,
};
use crate::ready::{self, ReadyFilter, ReadyWorkConfig, ReadyWorkItem};
use crate::snapshot::{validate_snapshot, SnapshotDocument};
use crate::store::{StoreOptions, TaskStore};

pub use stats::SchedulerStats;

/// Construction-time settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerOptions {
    pub store: StoreOptions,
    pub ready: ReadyWorkConfig,
}

impl SchedulerOptions {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            store: cfg.store_options(),
            ready: cfg.ready,
        }
    }
}

/// A task together with every edge touching it and its active blockers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetail {
    pub task: Task,
    pub dependencies: Vec<Dependency>,
    pub blockers: BTreeSet<TaskId>,
}

/// What an import changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub tasks: usize,
    pub dependencies: usize,
}

#[derive(Debug)]
pub struct Scheduler {
    store: TaskStore,
    graph: DependencyGraph,
    ready_config: ReadyWorkConfig,
    clock: Arc<dyn Clock>,
}

impl Scheduler {
    pub fn new(options: SchedulerOptions) -> Self {
        Self::with_clock(options, Arc::new(SystemClock))
    }

    pub fn with_clock(options: SchedulerOptions, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: TaskStore::new(options.store),
            graph: DependencyGraph::new(),
            ready_config: options.ready,
            clock,
        }
    }

    /// Construct a scheduler from a validated [`ConfigFile`].
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::new(SchedulerOptions::from_config(cfg))
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn ready_config(&self) -> &ReadyWorkConfig {
        &self.ready_config
    }

    // ------------------------------------------------------------------
    // Task store
    // ------------------------------------------------------------------

    pub fn create_task(&mut self, spec: TaskSpec, origin: &Origin) -> Result<Task> {
        let now = self.clock.now();
        self.store.create(spec, origin, now)
    }

    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> Result<Task> {
        let now = self.clock.now();
        self.store.update(id, update, now)
    }

    pub fn get_task(&self, id: &str) -> Result<Task> {
        self.store.get(id).cloned()
    }

    pub fn task_detail(&self, id: &str) -> Result<TaskDetail> {
        let task = self.get_task(id)?;
        Ok(TaskDetail {
            dependencies: self.graph.edges_touching(id),
            blockers: self.blockers(id),
            task,
        })
    }

    pub fn list_tasks(&self, filter: &TaskFilter) -> Vec<Task> {
        self.store.list(filter)
    }

    // ------------------------------------------------------------------
    // Dependency graph
    // ------------------------------------------------------------------

    pub fn add_dependency(
        &mut self,
        dependent: &str,
        blocker: &str,
        dependency_type: DependencyType,
        note: Option<String>,
    ) -> Result<Dependency> {
        let closes_cycle = dependency_type.affects_readiness()
            && dag::would_close_cycle(&self.store, &self.graph, dependent, blocker);

        let now = self.clock.now();
        let dep = self
            .graph
            .add(&self.store, dependent, blocker, dependency_type, note, now)?;

        if closes_cycle {
            warn!(
                dependent = %dependent,
                blocker = %blocker,
                "dependency closes a blocking cycle; these tasks cannot become ready"
            );
        }
        Ok(dep)
    }

    /// Remove every edge from `dependent` to `blocker`. Returns whether
    /// anything was removed.
    pub fn remove_dependency(&mut self, dependent: &str, blocker: &str) -> bool {
        !self.graph.remove(dependent, blocker).is_empty()
    }

    /// Active blockers of `task`. Unknown tasks have none.
    pub fn blockers(&self, task: &str) -> BTreeSet<TaskId> {
        BlockingView::new(&self.store, &self.graph).blockers(task)
    }

    pub fn blocking_cycles(&self) -> Vec<Vec<TaskId>> {
        dag::blocking_cycles(&self.store, &self.graph)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Ready work using the configured defaults.
    pub fn ready_work(&self, filter: &ReadyFilter) -> Vec<ReadyWorkItem> {
        self.ready_work_with(&self.ready_config, filter)
    }

    pub fn ready_work_with(&self, config: &ReadyWorkConfig, filter: &ReadyFilter) -> Vec<ReadyWorkItem> {
        ready::ready_work(&self.store, &self.graph, config, filter, self.clock.now())
    }

    pub fn blocked_tasks(&self) -> Vec<BlockedTask> {
        blocked::blocked_tasks(&self.store, &self.graph)
    }

    // ------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------

    pub fn export(&self) -> SnapshotDocument {
        let doc = SnapshotDocument::new(
            self.store.iter().cloned(),
            self.graph.iter().cloned(),
            self.clock.now(),
        );
        debug!(
            tasks = doc.tasks.len(),
            dependencies = doc.dependencies.len(),
            "exported snapshot"
        );
        doc
    }

    /// Merge a snapshot into the current state.
    ///
    /// The whole document is validated first; on error nothing changes.
    /// Records in the document overwrite records with the same id, other
    /// records are kept, and both id counters are re-derived afterwards.
    pub fn import(&mut self, doc: SnapshotDocument) -> Result<ImportSummary> {
        if let Err(e) = validate_snapshot(&doc, &self.store, &self.graph) {
            warn!(error = %e, "rejecting snapshot import");
            return Err(e);
        }

        let summary = ImportSummary {
            tasks: doc.tasks.len(),
            dependencies: doc.dependencies.len(),
        };

        self.store.upsert_all(doc.tasks.into_values());
        self.graph.upsert_all(doc.dependencies.into_values());

        info!(
            tasks = summary.tasks,
            dependencies = summary.dependencies,
            next_task_seq = self.store.next_sequence(),
            "imported snapshot"
        );
        Ok(summary)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerOptions::default())
    }
}
