// src/ready/engine.rs

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dag::{BlockingView, DependencyGraph};
use crate::model::Task;
use crate::ready::config::{ReadyFilter, ReadyWorkConfig};
use crate::ready::score::priority_score;
use crate::store::TaskStore;
use crate::types::SortStrategy;

/// A task that can be picked up now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyWorkItem {
    pub task: Task,
    pub ready_since: DateTime<Utc>,
    /// How many unfinished tasks wait on this one.
    pub blocking_count: usize,
    pub priority_score: f64,
}

/// Compute, rank and truncate the ready-work list.
pub fn ready_work(
    store: &TaskStore,
    graph: &DependencyGraph,
    config: &ReadyWorkConfig,
    filter: &ReadyFilter,
    now: DateTime<Utc>,
) -> Vec<ReadyWorkItem> {
    let view = BlockingView::new(store, graph);

    let mut items: Vec<ReadyWorkItem> = store
        .iter()
        .filter(|t| !t.is_terminal())
        .filter(|t| filter.matches(t))
        .filter(|t| !view.is_blocked(&t.id))
        .map(|t| ReadyWorkItem {
            task: t.clone(),
            ready_since: view.ready_since(t),
            blocking_count: view.pending_dependents(&t.id).len(),
            priority_score: priority_score(t, now, config.boost_threshold_hours),
        })
        .collect();

    items.sort_by(|a, b| compare(store, config.sort_strategy, a, b));

    debug!(
        ready = items.len(),
        max_items = config.max_items,
        strategy = %config.sort_strategy,
        "computed ready work"
    );

    items.truncate(config.max_items);
    items
}

fn compare(store: &TaskStore, strategy: SortStrategy, a: &ReadyWorkItem, b: &ReadyWorkItem) -> Ordering {
    let by_score = || b.priority_score.total_cmp(&a.priority_score);
    let by_age = || {
        a.task
            .created_at
            .cmp(&b.task.created_at)
            .then_with(|| store.sequence_of(&a.task.id).cmp(&store.sequence_of(&b.task.id)))
            .then_with(|| a.task.id.cmp(&b.task.id))
    };

    match strategy {
        SortStrategy::Hybrid => by_score().then_with(by_age),
        SortStrategy::Priority => a
            .task
            .priority
            .cmp(&b.task.priority)
            .then_with(by_score)
            .then_with(by_age),
        SortStrategy::Oldest => by_age(),
    }
}
