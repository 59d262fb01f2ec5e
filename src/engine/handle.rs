// src/engine/handle.rs

use std::collections::BTreeSet;

use tokio::sync::{mpsc, oneshot};

use crate::blocked::BlockedTask;
use crate::errors::{ReadyworkError, Result};
use crate::model::{
    Dependency, DependencyType, Origin, Task, TaskFilter, TaskId, TaskSpec, TaskUpdate,
};
use crate::ready::{ReadyFilter, ReadyWorkConfig, ReadyWorkItem};
use crate::scheduler::{ImportSummary, SchedulerStats, TaskDetail};
use crate::snapshot::SnapshotDocument;

use super::runtime::Envelope;
use super::{Request, Response};

/// Unwrap the expected response variant, passing failures through.
macro_rules! expect_response {
    ($response:expr, $variant:ident) => {
        match $response {
            Response::$variant(v) => Ok(v),
            Response::Failed(e) => Err(e),
            other => Err(unexpected(other)),
        }
    };
}

/// Cloneable client for a running [`Runtime`](super::Runtime).
///
/// Every method sends one request and waits for its reply. Once the
/// runtime has stopped, calls fail with [`ReadyworkError::RuntimeClosed`].
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    tx: mpsc::Sender<Envelope>,
}

impl SchedulerHandle {
    pub fn new(tx: mpsc::Sender<Envelope>) -> Self {
        Self { tx }
    }

    /// Send a raw request and wait for the reply.
    pub async fn call(&self, request: Request) -> Result<Response> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| ReadyworkError::RuntimeClosed)?;
        rx.await.map_err(|_| ReadyworkError::RuntimeClosed)
    }

    pub async fn create_task(&self, spec: TaskSpec, origin: Origin) -> Result<Task> {
        expect_response!(self.call(Request::CreateTask { spec, origin }).await?, Task)
    }

    pub async fn update_task(&self, id: impl Into<TaskId>, update: TaskUpdate) -> Result<Task> {
        let id = id.into();
        expect_response!(self.call(Request::UpdateTask { id, update }).await?, Task)
    }

    pub async fn get_task(&self, id: impl Into<TaskId>) -> Result<Task> {
        expect_response!(self.call(Request::GetTask { id: id.into() }).await?, Task)
    }

    pub async fn task_detail(&self, id: impl Into<TaskId>) -> Result<TaskDetail> {
        expect_response!(self.call(Request::TaskDetail { id: id.into() }).await?, Detail)
    }

    pub async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        expect_response!(self.call(Request::ListTasks { filter }).await?, Tasks)
    }

    pub async fn add_dependency(
        &self,
        dependent: impl Into<TaskId>,
        blocker: impl Into<TaskId>,
        dependency_type: DependencyType,
        note: Option<String>,
    ) -> Result<Dependency> {
        let request = Request::AddDependency {
            dependent: dependent.into(),
            blocker: blocker.into(),
            dependency_type,
            note,
        };
        expect_response!(self.call(request).await?, Dependency)
    }

    pub async fn remove_dependency(
        &self,
        dependent: impl Into<TaskId>,
        blocker: impl Into<TaskId>,
    ) -> Result<bool> {
        let request = Request::RemoveDependency {
            dependent: dependent.into(),
            blocker: blocker.into(),
        };
        expect_response!(self.call(request).await?, Removed)
    }

    pub async fn blockers(&self, id: impl Into<TaskId>) -> Result<BTreeSet<TaskId>> {
        expect_response!(self.call(Request::Blockers { id: id.into() }).await?, Blockers)
    }

    pub async fn ready_work(
        &self,
        config: Option<ReadyWorkConfig>,
        filter: ReadyFilter,
    ) -> Result<Vec<ReadyWorkItem>> {
        expect_response!(
            self.call(Request::ReadyWork { config, filter }).await?,
            ReadyWork
        )
    }

    pub async fn ready_config(&self) -> Result<ReadyWorkConfig> {
        expect_response!(self.call(Request::ReadyConfig).await?, ReadyConfig)
    }

    pub async fn blocked_tasks(&self) -> Result<Vec<BlockedTask>> {
        expect_response!(self.call(Request::BlockedTasks).await?, Blocked)
    }

    pub async fn blocking_cycles(&self) -> Result<Vec<Vec<TaskId>>> {
        expect_response!(self.call(Request::BlockingCycles).await?, Cycles)
    }

    pub async fn batch_create_tasks(
        &self,
        specs: Vec<TaskSpec>,
        origin: Origin,
        parent: Option<TaskId>,
    ) -> Result<Vec<Task>> {
        let request = Request::BatchCreate {
            specs,
            origin,
            parent,
        };
        expect_response!(self.call(request).await?, Tasks)
    }

    pub async fn export(&self) -> Result<SnapshotDocument> {
        expect_response!(self.call(Request::Export).await?, Snapshot)
    }

    pub async fn import(&self, doc: SnapshotDocument) -> Result<ImportSummary> {
        expect_response!(self.call(Request::Import { doc }).await?, Imported)
    }

    pub async fn stats(&self) -> Result<SchedulerStats> {
        expect_response!(self.call(Request::Stats).await?, Stats)
    }

    /// Ask the runtime to stop after the requests queued before this one.
    pub async fn shutdown(&self) -> Result<()> {
        match self.call(Request::Shutdown).await? {
            Response::ShuttingDown => Ok(()),
            Response::Failed(e) => Err(e),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: Response) -> ReadyworkError {
    ReadyworkError::Other(anyhow::anyhow!("unexpected runtime response: {response:?}"))
}
