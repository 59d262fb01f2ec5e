// tests/scenarios.rs

mod common;

use common::{init_tracing, SchedulerFixture, TaskSpecBuilder};
use readywork::errors::{ReadyworkError, RejectReason};
use readywork::model::{DependencyType, Origin, TaskFilter, TaskPriority, TaskSpec, TaskStatus, TaskType};
use readywork::ready::ReadyFilter;

/// "Fix login bug" (bug, high) blocks "Deploy fix" (medium).
fn login_fix() -> (SchedulerFixture, String, String) {
    let mut fx = SchedulerFixture::new();
    let a = fx.create_spec(
        TaskSpecBuilder::new("Fix login bug")
            .task_type(TaskType::Bug)
            .priority(TaskPriority::High)
            .build(),
    );
    let b = fx.create_spec(
        TaskSpecBuilder::new("Deploy fix")
            .priority(TaskPriority::Medium)
            .build(),
    );
    fx.block(&b.id, &a.id);
    (fx, a.id, b.id)
}

#[test]
fn blocked_task_is_not_ready() {
    init_tracing();
    let (fx, a, b) = login_fix();

    let ready = fx.ready_ids();
    assert!(ready.contains(&a));
    assert!(!ready.contains(&b));
    assert_eq!(fx.blocked_ids(), vec![b]);
}

#[test]
fn completing_the_blocker_releases_the_dependent() {
    init_tracing();
    let (mut fx, a, b) = login_fix();

    fx.clock.advance_hours(2);
    fx.complete(&a);

    assert_eq!(fx.ready_ids(), vec![b.clone()]);
    assert!(fx.scheduler.blocked_tasks().is_empty());

    let item = &fx.scheduler.ready_work(&ReadyFilter::default())[0];
    assert_eq!(item.ready_since, fx.now());
}

#[test]
fn batch_with_parent_links_provenance_without_blocking() {
    init_tracing();
    let (mut fx, a, _) = login_fix();

    let specs = vec![TaskSpec::new("Investigate cache miss"), TaskSpec::new("Add metric")];
    let created = fx
        .scheduler
        .batch_create_tasks(specs, &Origin::new("agent").with_session("s-1"), Some(a.as_str()))
        .unwrap();
    assert_eq!(created.len(), 2);

    for task in &created {
        assert_eq!(task.session_id.as_deref(), Some("s-1"));
        let detail = fx.scheduler.task_detail(&task.id).unwrap();
        assert_eq!(detail.dependencies.len(), 1);
        assert_eq!(detail.dependencies[0].dependency_type, DependencyType::DiscoveredFrom);
        assert_eq!(detail.dependencies[0].blocker_id, a);
    }

    let ready = fx.ready_ids();
    for task in &created {
        assert!(ready.contains(&task.id), "{} should be ready", task.id);
    }
    // The parent is not held back by the tasks discovered from it.
    assert!(ready.contains(&a));
}

#[test]
fn dependency_on_unknown_tasks_is_rejected() {
    init_tracing();
    let (mut fx, _, _) = login_fix();
    let before = fx.scheduler.graph().len();

    let err = fx
        .scheduler
        .add_dependency("X", "does-not-exist", DependencyType::Blocks, None)
        .unwrap_err();
    assert!(matches!(
        err,
        ReadyworkError::Rejected(RejectReason::UnknownDependent)
    ));
    assert_eq!(fx.scheduler.graph().len(), before);
}

#[test]
fn export_import_reproduces_lists() {
    init_tracing();
    let (mut fx, a, _) = login_fix();
    let c = fx.create("Write release notes");
    fx.block(&c.id, &a);
    fx.set_status(&c.id, TaskStatus::InProgress);

    let mut fresh = SchedulerFixture::new();
    fresh.scheduler.import(fx.scheduler.export()).unwrap();

    assert_eq!(
        fresh.scheduler.list_tasks(&TaskFilter::default()),
        fx.scheduler.list_tasks(&TaskFilter::default())
    );
    assert_eq!(fresh.scheduler.blocked_tasks(), fx.scheduler.blocked_tasks());
    assert_eq!(fresh.ready_ids(), fx.ready_ids());
}

#[test]
fn cancelled_blocker_keeps_blocking_until_edge_removed() {
    init_tracing();
    let (mut fx, a, b) = login_fix();

    fx.set_status(&a, TaskStatus::Cancelled);
    assert!(!fx.ready_ids().contains(&b));
    assert_eq!(fx.blocked_ids(), vec![b.clone()]);

    assert!(fx.scheduler.remove_dependency(&b, &a));
    assert_eq!(fx.ready_ids(), vec![b]);
}

#[test]
fn reopening_a_blocker_blocks_again() {
    init_tracing();
    let (mut fx, a, b) = login_fix();
    fx.complete(&a);
    assert!(fx.ready_ids().contains(&b));

    let reopened = fx.set_status(&a, TaskStatus::Open);
    assert!(reopened.completed_at.is_none());
    assert!(!fx.ready_ids().contains(&b));
}

#[test]
fn bugs_outrank_older_chores_at_same_priority() {
    init_tracing();
    let mut fx = SchedulerFixture::new();
    let chore = fx.create_spec(TaskSpecBuilder::new("Tidy").task_type(TaskType::Chore).build());
    fx.clock.advance_hours(1);
    let bug = fx.create_spec(TaskSpecBuilder::new("Crash").task_type(TaskType::Bug).build());

    assert_eq!(fx.ready_ids(), vec![bug.id, chore.id]);
}

#[test]
fn blocking_cycle_is_reported_and_never_ready() {
    init_tracing();
    let mut fx = SchedulerFixture::new();
    let a = fx.create("a");
    let b = fx.create("b");
    fx.block(&a.id, &b.id);
    fx.block(&b.id, &a.id);

    assert!(fx.ready_ids().is_empty());
    assert_eq!(
        fx.scheduler.blocking_cycles(),
        vec![vec![a.id.clone(), b.id.clone()]]
    );
}
