// tests/runtime.rs

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use common::init_tracing;
use readywork::clock::MockClock;
use readywork::engine::{self, DEFAULT_CHANNEL_CAPACITY};
use readywork::errors::{ReadyworkError, RejectReason};
use readywork::model::{DependencyType, Origin, TaskSpec, TaskStatus, TaskUpdate};
use readywork::ready::ReadyFilter;
use readywork::scheduler::{Scheduler, SchedulerOptions};
use readywork_test_utils::with_timeout;

fn scheduler() -> Scheduler {
    Scheduler::with_clock(SchedulerOptions::default(), Arc::new(MockClock::at_epoch()))
}

#[tokio::test]
async fn handle_drives_a_full_workflow() {
    init_tracing();
    let (handle, join) = engine::spawn(scheduler(), DEFAULT_CHANNEL_CAPACITY);

    with_timeout(async {
        let a = handle
            .create_task(TaskSpec::new("Fix login bug"), Origin::default())
            .await
            .unwrap();
        let b = handle
            .create_task(TaskSpec::new("Deploy fix"), Origin::default())
            .await
            .unwrap();
        handle
            .add_dependency(b.id.clone(), a.id.clone(), DependencyType::Blocks, None)
            .await
            .unwrap();

        let ready = handle.ready_work(None, ReadyFilter::default()).await.unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].task.id, a.id);
        assert_eq!(ready[0].blocking_count, 1);

        handle
            .update_task(a.id.clone(), TaskUpdate::status(TaskStatus::Completed))
            .await
            .unwrap();
        assert!(handle.blocked_tasks().await.unwrap().is_empty());
        assert!(handle.blockers(b.id.clone()).await.unwrap().is_empty());

        let stats = handle.stats().await.unwrap();
        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.ready_tasks, 1);

        handle.shutdown().await.unwrap();
    })
    .await;

    let scheduler = join.await.unwrap();
    assert_eq!(scheduler.store().len(), 2);
}

#[tokio::test]
async fn errors_travel_back_to_the_caller() {
    init_tracing();
    let (handle, join) = engine::spawn(scheduler(), DEFAULT_CHANNEL_CAPACITY);

    let err = handle.get_task("task-9").await.unwrap_err();
    assert!(matches!(err, ReadyworkError::NotFound(id) if id == "task-9"));

    let a = handle
        .create_task(TaskSpec::new("a"), Origin::default())
        .await
        .unwrap();
    let err = handle
        .add_dependency(a.id.clone(), a.id.clone(), DependencyType::Blocks, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReadyworkError::Rejected(RejectReason::SelfLoop)));

    // The runtime keeps serving after a failed request.
    assert_eq!(handle.get_task(a.id).await.unwrap().title, "a");

    handle.shutdown().await.unwrap();
    join.await.unwrap();
}

#[tokio::test]
async fn calls_after_shutdown_report_runtime_closed() {
    init_tracing();
    let (handle, join) = engine::spawn(scheduler(), DEFAULT_CHANNEL_CAPACITY);
    handle.shutdown().await.unwrap();
    join.await.unwrap();

    let err = handle.stats().await.unwrap_err();
    assert!(matches!(err, ReadyworkError::RuntimeClosed));
}

#[tokio::test]
async fn dropping_every_handle_stops_the_runtime() {
    init_tracing();
    let (handle, join) = engine::spawn(scheduler(), DEFAULT_CHANNEL_CAPACITY);
    handle
        .create_task(TaskSpec::new("only"), Origin::default())
        .await
        .unwrap();
    drop(handle);

    let scheduler = with_timeout(join).await.unwrap();
    assert_eq!(scheduler.store().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_clients_see_consistent_state() {
    init_tracing();
    let (handle, join) = engine::spawn(scheduler(), 8);

    let root = handle
        .create_task(TaskSpec::new("root"), Origin::default())
        .await
        .unwrap();

    let mut writers = Vec::new();
    for client in 0..8 {
        let handle = handle.clone();
        let root = root.id.clone();
        writers.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for n in 0..10 {
                let task = handle
                    .create_task(TaskSpec::new(format!("client {client} task {n}")), Origin::default())
                    .await
                    .unwrap();
                handle
                    .add_dependency(task.id.clone(), root.clone(), DependencyType::Blocks, None)
                    .await
                    .unwrap();
                ids.push(task.id);
            }
            ids
        }));
    }

    let reader = {
        let handle = handle.clone();
        tokio::spawn(async move {
            for _ in 0..20 {
                // Only whole requests are ever observed.
                let blocked = handle.blocked_tasks().await.unwrap();
                for b in blocked {
                    assert_eq!(b.blocker_count(), 1);
                }
                tokio::task::yield_now().await;
            }
        })
    };

    let mut all_ids = BTreeSet::new();
    for w in writers {
        for id in w.await.unwrap() {
            assert!(all_ids.insert(id), "ids must be unique");
        }
    }
    reader.await.unwrap();

    assert_eq!(all_ids.len(), 80);
    let blocked = handle.blocked_tasks().await.unwrap();
    assert_eq!(blocked.len(), 80);

    let ready = handle.ready_work(None, ReadyFilter::default()).await.unwrap();
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].blocking_count, 80);

    handle.shutdown().await.unwrap();
    join.await.unwrap();
}
