// src/scheduler/stats.rs

use serde::{Deserialize, Serialize};

use crate::model::TaskStatus;
use crate::ready::ReadyFilter;
use crate::scheduler::Scheduler;

/// Aggregate counts over the whole scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub total_tasks: usize,
    pub open_tasks: usize,
    pub in_progress_tasks: usize,
    /// Tasks whose status field says `blocked`.
    pub blocked_status_tasks: usize,
    /// Unfinished tasks with at least one active blocker.
    pub blocked_tasks: usize,
    pub ready_tasks: usize,
    pub completed_tasks: usize,
    pub cancelled_tasks: usize,
    pub dependencies: usize,
    /// Mean hours from creation to completion over completed tasks.
    pub avg_completion_hours: Option<f64>,
}

impl Scheduler {
    pub fn stats(&self) -> SchedulerStats {
        let count = |status: TaskStatus| self.store().iter().filter(|t| t.status == status).count();

        let durations: Vec<f64> = self
            .store()
            .iter()
            .filter_map(|t| t.completed_at.map(|done| done - t.created_at))
            .map(|d| d.num_milliseconds() as f64 / 3_600_000.0)
            .collect();
        let avg_completion_hours =
            (!durations.is_empty()).then(|| durations.iter().sum::<f64>() / durations.len() as f64);

        let unbounded = self.ready_config().unbounded();

        SchedulerStats {
            total_tasks: self.store().len(),
            open_tasks: count(TaskStatus::Open),
            in_progress_tasks: count(TaskStatus::InProgress),
            blocked_status_tasks: count(TaskStatus::Blocked),
            blocked_tasks: self.blocked_tasks().len(),
            ready_tasks: self.ready_work_with(&unbounded, &ReadyFilter::default()).len(),
            completed_tasks: count(TaskStatus::Completed),
            cancelled_tasks: count(TaskStatus::Cancelled),
            dependencies: self.graph().len(),
            avg_completion_hours,
        }
    }
}
