// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! [`CoreRuntime::step`] maps one [`Request`] to one [`Response`] against the
//! owned scheduler. It has no channels, no Tokio types and performs no IO,
//! so it can be unit tested directly.

use tracing::debug;

use crate::engine::{Request, Response};
use crate::errors::Result;
use crate::scheduler::Scheduler;

/// Result of handling a single request.
#[derive(Debug)]
pub struct CoreStep {
    pub response: Response,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

#[derive(Debug)]
pub struct CoreRuntime {
    scheduler: Scheduler,
    handled: u64,
}

impl CoreRuntime {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            handled: 0,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Number of requests processed so far.
    pub fn handled(&self) -> u64 {
        self.handled
    }

    pub fn into_scheduler(self) -> Scheduler {
        self.scheduler
    }

    pub fn step(&mut self, request: Request) -> CoreStep {
        self.handled += 1;
        debug!(
            seq = self.handled,
            mutation = request.is_mutation(),
            "core handling request"
        );

        let s = &mut self.scheduler;
        let response = match request {
            Request::CreateTask { spec, origin } => reply(s.create_task(spec, &origin), Response::Task),
            Request::UpdateTask { id, update } => reply(s.update_task(&id, update), Response::Task),
            Request::GetTask { id } => reply(s.get_task(&id), Response::Task),
            Request::TaskDetail { id } => reply(s.task_detail(&id), Response::Detail),
            Request::ListTasks { filter } => Response::Tasks(s.list_tasks(&filter)),
            Request::AddDependency {
                dependent,
                blocker,
                dependency_type,
                note,
            } => reply(
                s.add_dependency(&dependent, &blocker, dependency_type, note),
                Response::Dependency,
            ),
            Request::RemoveDependency { dependent, blocker } => {
                Response::Removed(s.remove_dependency(&dependent, &blocker))
            }
            Request::Blockers { id } => Response::Blockers(s.blockers(&id)),
            Request::ReadyWork { config, filter } => {
                let items = match config {
                    Some(cfg) => s.ready_work_with(&cfg, &filter),
                    None => s.ready_work(&filter),
                };
                Response::ReadyWork(items)
            }
            Request::ReadyConfig => Response::ReadyConfig(*s.ready_config()),
            Request::BlockedTasks => Response::Blocked(s.blocked_tasks()),
            Request::BlockingCycles => Response::Cycles(s.blocking_cycles()),
            Request::BatchCreate {
                specs,
                origin,
                parent,
            } => reply(
                s.batch_create_tasks(specs, &origin, parent.as_deref()),
                Response::Tasks,
            ),
            Request::Export => Response::Snapshot(s.export()),
            Request::Import { doc } => reply(s.import(doc), Response::Imported),
            Request::Stats => Response::Stats(s.stats()),
            Request::Shutdown => {
                return CoreStep {
                    response: Response::ShuttingDown,
                    keep_running: false,
                };
            }
        };

        CoreStep {
            response,
            keep_running: true,
        }
    }
}

fn reply<T>(result: Result<T>, wrap: impl FnOnce(T) -> Response) -> Response {
    match result {
        Ok(v) => wrap(v),
        Err(e) => Response::Failed(e),
    }
}
