// src/blocked.rs

//! Blocked-work report: unfinished tasks that are waiting on something.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dag::{BlockingView, DependencyGraph};
use crate::model::{Task, TaskId};
use crate::store::TaskStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedTask {
    pub task: Task,
    pub blockers: BTreeSet<TaskId>,
}

impl BlockedTask {
    pub fn blocker_count(&self) -> usize {
        self.blockers.len()
    }
}

/// Every non-terminal task with at least one active blocker.
///
/// No ranking is applied; results come back in id sequence order so the
/// report is stable between calls.
pub fn blocked_tasks(store: &TaskStore, graph: &DependencyGraph) -> Vec<BlockedTask> {
    let view = BlockingView::new(store, graph);

    let mut blocked: Vec<BlockedTask> = store
        .iter()
        .filter(|t| !t.is_terminal())
        .filter_map(|t| {
            let blockers = view.blockers(&t.id);
            (!blockers.is_empty()).then(|| BlockedTask {
                task: t.clone(),
                blockers,
            })
        })
        .collect();

    blocked.sort_by_key(|b| (store.sequence_of(&b.task.id), b.task.id.clone()));
    blocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DependencyType, Origin, TaskSpec, TaskStatus, TaskUpdate};
    use chrono::Utc;

    #[test]
    fn reports_only_unfinished_blocked_tasks() {
        let mut store = TaskStore::default();
        let mut graph = DependencyGraph::new();
        let now = Utc::now();
        for t in ["a", "b", "c", "d"] {
            store.create(TaskSpec::new(t), &Origin::default(), now).unwrap();
        }
        graph.add(&store, "task-2", "task-1", DependencyType::Blocks, None, now).unwrap();
        graph.add(&store, "task-3", "task-1", DependencyType::Blocks, None, now).unwrap();
        graph.add(&store, "task-3", "task-4", DependencyType::Blocks, None, now).unwrap();
        store
            .update("task-2", TaskUpdate::status(TaskStatus::Cancelled), now)
            .unwrap();

        let report = blocked_tasks(&store, &graph);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].task.id, "task-3");
        assert_eq!(report[0].blocker_count(), 2);
    }
}
