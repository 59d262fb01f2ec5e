// src/engine/runtime.rs

use std::fmt;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::scheduler::Scheduler;

use super::core::CoreRuntime;
use super::handle::SchedulerHandle;
use super::{Request, Response};

/// Default capacity of the request channel used by [`spawn`].
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// A request paired with the channel its reply goes back on.
#[derive(Debug)]
pub struct Envelope {
    pub request: Request,
    pub reply: oneshot::Sender<Response>,
}

/// Owns the scheduler and serves requests from `request_rx` in arrival
/// order.
///
/// This is a pure IO shell around [`CoreRuntime`], which holds all the
/// semantics. Each request is handled to completion before the next one
/// is read, so every caller observes a single consistent sequence of
/// states.
pub struct Runtime {
    core: CoreRuntime,
    request_rx: mpsc::Receiver<Envelope>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(core: CoreRuntime, request_rx: mpsc::Receiver<Envelope>) -> Self {
        Self { core, request_rx }
    }

    /// Main request loop.
    ///
    /// Runs until a [`Request::Shutdown`] arrives or every handle has been
    /// dropped, then gives the scheduler back so the caller can persist it.
    pub async fn run(mut self) -> Scheduler {
        info!("readywork runtime started");

        while let Some(Envelope { request, reply }) = self.request_rx.recv().await {
            let step = self.core.step(request);

            // The caller may have given up waiting; that is not our problem.
            if reply.send(step.response).is_err() {
                debug!("requester dropped before reply was sent");
            }

            if !step.keep_running {
                info!("shutdown requested; stopping runtime");
                break;
            }
        }

        info!(handled = self.core.handled(), "runtime exiting");
        self.core.into_scheduler()
    }
}

/// Start a runtime for `scheduler` on the current Tokio runtime.
///
/// Returns a handle for sending requests and the join handle of the
/// runtime task, which resolves to the scheduler once the runtime stops.
pub fn spawn(scheduler: Scheduler, capacity: usize) -> (SchedulerHandle, JoinHandle<Scheduler>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let runtime = Runtime::new(CoreRuntime::new(scheduler), rx);
    let join = tokio::spawn(runtime.run());
    (SchedulerHandle::new(tx), join)
}
