// tests/properties.rs

mod common;

use std::collections::BTreeSet;

use chrono::Duration;
use clap::ValueEnum;
use proptest::prelude::*;
use proptest::sample::select;
use readywork::model::{DependencyType, TaskPriority, TaskStatus, TaskType};
use readywork::ready::{priority_score, ReadyFilter, ReadyWorkConfig};
use readywork::scheduler::Scheduler;

use common::{SchedulerFixture, TaskSpecBuilder};

fn status_strategy() -> impl Strategy<Value = TaskStatus> {
    select(TaskStatus::value_variants())
}

fn priority_strategy() -> impl Strategy<Value = TaskPriority> {
    (0u8..=4).prop_map(|v| TaskPriority::try_from(v).unwrap())
}

fn type_strategy() -> impl Strategy<Value = TaskType> {
    select(TaskType::value_variants())
}

/// Task statuses plus raw (dependent, blocker) index pairs. Pairs are
/// reduced modulo the task count when applied; self-loops and duplicates
/// are simply rejected by the scheduler.
fn graph_strategy(
    max_tasks: usize,
) -> impl Strategy<Value = (Vec<TaskStatus>, Vec<(usize, usize)>)> {
    (1..=max_tasks).prop_flat_map(move |n| {
        (
            proptest::collection::vec(status_strategy(), n),
            proptest::collection::vec((0..n, 0..n), 0..(n * 2)),
        )
    })
}

fn build(statuses: &[TaskStatus], edges: &[(usize, usize)]) -> (SchedulerFixture, Vec<String>) {
    let mut fx = SchedulerFixture::new();
    let ids: Vec<String> = (0..statuses.len())
        .map(|i| fx.create(&format!("task {i}")).id)
        .collect();

    for &(dependent, blocker) in edges {
        let _ = fx.scheduler.add_dependency(
            &ids[dependent],
            &ids[blocker],
            DependencyType::Blocks,
            None,
        );
    }

    for (id, status) in ids.iter().zip(statuses) {
        if *status != TaskStatus::Open {
            fx.set_status(id, *status);
        }
    }
    (fx, ids)
}

fn ready_set(s: &Scheduler) -> BTreeSet<String> {
    s.ready_work_with(&ReadyWorkConfig::default().unbounded(), &ReadyFilter::default())
        .into_iter()
        .map(|item| item.task.id)
        .collect()
}

fn blocked_set(s: &Scheduler) -> BTreeSet<String> {
    s.blocked_tasks().into_iter().map(|b| b.task.id).collect()
}

proptest! {
    #[test]
    fn unfinished_task_is_ready_iff_it_has_no_blockers(
        (statuses, edges) in graph_strategy(10)
    ) {
        let (fx, ids) = build(&statuses, &edges);
        let ready = ready_set(&fx.scheduler);
        let blocked = blocked_set(&fx.scheduler);

        for id in &ids {
            let task = fx.scheduler.get_task(id).unwrap();
            if task.is_terminal() {
                prop_assert!(!ready.contains(id));
                prop_assert!(!blocked.contains(id));
                continue;
            }
            let has_blockers = !fx.scheduler.blockers(id).is_empty();
            prop_assert_eq!(ready.contains(id), !has_blockers, "task {}", id);
            prop_assert_eq!(blocked.contains(id), has_blockers, "task {}", id);
        }
    }

    #[test]
    fn non_blocking_edges_never_change_readiness(
        (statuses, edges) in graph_strategy(8),
        extra in proptest::collection::vec((0usize..8, 0usize..8, 1usize..4), 0..12),
    ) {
        let (mut fx, ids) = build(&statuses, &edges);
        let ready_before = ready_set(&fx.scheduler);
        let blocked_before = blocked_set(&fx.scheduler);

        let kinds = [
            DependencyType::Blocks,
            DependencyType::Related,
            DependencyType::ParentChild,
            DependencyType::DiscoveredFrom,
        ];
        for (dependent, blocker, kind) in extra {
            let n = ids.len();
            let _ = fx.scheduler.add_dependency(
                &ids[dependent % n],
                &ids[blocker % n],
                kinds[kind],
                None,
            );
        }

        prop_assert_eq!(ready_set(&fx.scheduler), ready_before);
        prop_assert_eq!(blocked_set(&fx.scheduler), blocked_before);
    }

    #[test]
    fn score_grows_with_age_and_is_capped(
        priority in priority_strategy(),
        task_type in type_strategy(),
        younger_minutes in 0i64..(24 * 60 * 10),
        extra_minutes in 0i64..(24 * 60 * 10),
    ) {
        let mut fx = SchedulerFixture::new();
        let task = fx.create_spec(
            TaskSpecBuilder::new("t").priority(priority).task_type(task_type).build(),
        );
        let threshold = ReadyWorkConfig::default().boost_threshold_hours;

        let young = priority_score(&task, task.created_at + Duration::minutes(younger_minutes), threshold);
        let old = priority_score(
            &task,
            task.created_at + Duration::minutes(younger_minutes + extra_minutes),
            threshold,
        );
        prop_assert!(old >= young, "score dropped from {} to {}", young, old);

        let base = 10.0 - 2.0 * f64::from(priority.value()) + task_type.score_boost();
        prop_assert!(old <= (base + 5.0).max(0.0) + 1e-9);
        prop_assert!(young >= 0.0);
    }

    #[test]
    fn export_then_import_is_lossless(
        (statuses, edges) in graph_strategy(8)
    ) {
        let (fx, _) = build(&statuses, &edges);
        let exported = fx.scheduler.export();

        let mut fresh = SchedulerFixture::new();
        fresh.scheduler.import(exported.clone()).unwrap();
        let again = fresh.scheduler.export();

        prop_assert_eq!(again.tasks, exported.tasks);
        prop_assert_eq!(again.dependencies, exported.dependencies);
    }
}
