#![allow(dead_code)]

use std::sync::Arc;

use readywork::clock::{Clock, MockClock};
use readywork::model::{
    Dependency, DependencyType, Origin, Task, TaskPriority, TaskSpec, TaskStatus, TaskType,
    TaskUpdate,
};
use readywork::ready::ReadyFilter;
use readywork::scheduler::{Scheduler, SchedulerOptions};

/// Builder for `TaskSpec` to simplify test setup.
pub struct TaskSpecBuilder {
    spec: TaskSpec,
}

impl TaskSpecBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            spec: TaskSpec::new(title),
        }
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.spec.priority = priority;
        self
    }

    pub fn task_type(mut self, task_type: TaskType) -> Self {
        self.spec.task_type = task_type;
        self
    }

    pub fn assignee(mut self, assignee: &str) -> Self {
        self.spec.assignee = Some(assignee.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.spec.category = Some(category.to_string());
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.spec.labels.push(label.to_string());
        self
    }

    pub fn build(self) -> TaskSpec {
        self.spec
    }
}

/// A scheduler driven by a [`MockClock`], plus shorthands for the common
/// create / link / complete steps.
pub struct SchedulerFixture {
    pub scheduler: Scheduler,
    pub clock: MockClock,
}

impl SchedulerFixture {
    pub fn new() -> Self {
        Self::with_options(SchedulerOptions::default())
    }

    pub fn with_options(options: SchedulerOptions) -> Self {
        let clock = MockClock::at_epoch();
        let scheduler = Scheduler::with_clock(options, Arc::new(clock.clone()));
        Self { scheduler, clock }
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    pub fn create(&mut self, title: &str) -> Task {
        self.create_spec(TaskSpec::new(title))
    }

    pub fn create_spec(&mut self, spec: TaskSpec) -> Task {
        self.scheduler
            .create_task(spec, &Origin::default())
            .expect("create_task failed")
    }

    /// `dependent` is blocked by `blocker`.
    pub fn block(&mut self, dependent: &str, blocker: &str) -> Dependency {
        self.link(dependent, blocker, DependencyType::Blocks)
    }

    pub fn link(&mut self, dependent: &str, blocker: &str, ty: DependencyType) -> Dependency {
        self.scheduler
            .add_dependency(dependent, blocker, ty, None)
            .expect("add_dependency failed")
    }

    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> Task {
        self.scheduler
            .update_task(id, TaskUpdate::status(status))
            .expect("update_task failed")
    }

    pub fn complete(&mut self, id: &str) -> Task {
        self.set_status(id, TaskStatus::Completed)
    }

    /// Ids of ready work with the configured defaults, in rank order.
    pub fn ready_ids(&self) -> Vec<String> {
        self.scheduler
            .ready_work(&ReadyFilter::default())
            .into_iter()
            .map(|item| item.task.id)
            .collect()
    }

    pub fn blocked_ids(&self) -> Vec<String> {
        self.scheduler
            .blocked_tasks()
            .into_iter()
            .map(|b| b.task.id)
            .collect()
    }
}

impl Default for SchedulerFixture {
    fn default() -> Self {
        Self::new()
    }
}
