// src/scheduler/batch.rs

//! Bulk task creation with optional provenance links.

use tracing::{info, warn};

use crate::errors::{ReadyworkError, Result};
use crate::model::{DependencyType, Origin, Task, TaskSpec};
use crate::scheduler::Scheduler;

impl Scheduler {
    /// Create one task per spec.
    ///
    /// Every spec is shape-checked before the first task is created, so a
    /// bad entry rejects the whole batch. When `parent` names an existing
    /// task, each new task gets a `DiscoveredFrom` edge to it; an unknown
    /// parent is logged and the tasks are created unlinked.
    pub fn batch_create_tasks(
        &mut self,
        specs: Vec<TaskSpec>,
        origin: &Origin,
        parent: Option<&str>,
    ) -> Result<Vec<Task>> {
        for (idx, spec) in specs.iter().enumerate() {
            self.store().validate_spec(spec).map_err(|e| match e {
                ReadyworkError::InvalidTask(msg) => {
                    ReadyworkError::InvalidTask(format!("batch entry {idx}: {msg}"))
                }
                other => other,
            })?;
        }

        let parent = match parent {
            Some(id) if self.store().contains(id) => Some(id),
            Some(id) => {
                warn!(parent = %id, "batch parent task does not exist; tasks will not be linked");
                None
            }
            None => None,
        };

        let mut created = Vec::with_capacity(specs.len());
        for spec in specs {
            let task = self.create_task(spec, origin)?;
            if let Some(parent) = parent {
                self.add_dependency(&task.id, parent, DependencyType::DiscoveredFrom, None)?;
            }
            created.push(task);
        }

        info!(
            count = created.len(),
            source = %origin.source,
            parent = parent.unwrap_or("-"),
            "batch created tasks"
        );
        Ok(created)
    }
}
