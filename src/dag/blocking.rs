// src/dag/blocking.rs

//! Read-only blocking queries over a store + graph pair.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::dag::DependencyGraph;
use crate::model::{Task, TaskId, TaskStatus};
use crate::store::TaskStore;

/// A read-only view used to answer "is this task blocked, and by whom".
///
/// This is the canonical implementation of blocking semantics: only
/// `Blocks` edges count, and a blocker stops blocking only once it is
/// `Completed`.
#[derive(Debug, Clone, Copy)]
pub struct BlockingView<'a> {
    store: &'a TaskStore,
    graph: &'a DependencyGraph,
}

impl<'a> BlockingView<'a> {
    pub fn new(store: &'a TaskStore, graph: &'a DependencyGraph) -> Self {
        Self { store, graph }
    }

    /// Ids of tasks that currently block `task`.
    pub fn blockers(&self, task: &str) -> BTreeSet<TaskId> {
        self.graph
            .outgoing(task)
            .filter(|d| d.dependency_type.affects_readiness())
            .filter(|d| match self.store.status_of(&d.blocker_id) {
                Some(status) => !status.releases_dependents(),
                None => {
                    warn!(
                        task = %task,
                        blocker = %d.blocker_id,
                        "blocking task missing from store; ignoring edge"
                    );
                    false
                }
            })
            .map(|d| d.blocker_id.clone())
            .collect()
    }

    pub fn is_blocked(&self, task: &str) -> bool {
        !self.blockers(task).is_empty()
    }

    /// Distinct tasks that wait on `task` through a `Blocks` edge and are
    /// not yet completed. This is how many tasks finishing `task` helps.
    pub fn pending_dependents(&self, task: &str) -> BTreeSet<TaskId> {
        self.graph
            .incoming(task)
            .filter(|d| d.dependency_type.affects_readiness())
            .filter(|d| {
                self.store
                    .status_of(&d.dependent_id)
                    .is_some_and(|s| s != TaskStatus::Completed)
            })
            .map(|d| d.dependent_id.clone())
            .collect()
    }

    /// When `task` became workable: its creation, or the latest completion
    /// among the blockers it waited on, whichever is later.
    pub fn ready_since(&self, task: &Task) -> DateTime<Utc> {
        self.graph
            .outgoing(&task.id)
            .filter(|d| d.dependency_type.affects_readiness())
            .filter_map(|d| self.store.get(&d.blocker_id).ok())
            .filter_map(|blocker| blocker.completed_at)
            .fold(task.created_at, Ord::max)
    }
}
