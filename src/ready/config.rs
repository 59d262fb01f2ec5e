// src/ready/config.rs

use serde::{Deserialize, Serialize};

use crate::model::{Task, TaskPriority};
use crate::types::SortStrategy;

/// Tuning for ready-work queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadyWorkConfig {
    /// Maximum number of items returned.
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Tasks older than this start receiving an age boost.
    #[serde(default = "default_boost_threshold_hours")]
    pub boost_threshold_hours: f64,

    #[serde(default)]
    pub sort_strategy: SortStrategy,
}

pub const DEFAULT_MAX_ITEMS: usize = 20;
pub const DEFAULT_BOOST_THRESHOLD_HOURS: f64 = 24.0;

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

fn default_boost_threshold_hours() -> f64 {
    DEFAULT_BOOST_THRESHOLD_HOURS
}

impl Default for ReadyWorkConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            boost_threshold_hours: DEFAULT_BOOST_THRESHOLD_HOURS,
            sort_strategy: SortStrategy::default(),
        }
    }
}

impl ReadyWorkConfig {
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_strategy(mut self, sort_strategy: SortStrategy) -> Self {
        self.sort_strategy = sort_strategy;
        self
    }

    /// Same settings without truncation; used for counting.
    pub fn unbounded(mut self) -> Self {
        self.max_items = usize::MAX;
        self
    }
}

/// Optional narrowing of the ready-work candidate set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadyFilter {
    pub category: Option<String>,
    pub assignee: Option<String>,
    pub priority: Option<TaskPriority>,
}

impl ReadyFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.priority.is_none_or(|p| task.priority == p)
            && self
                .category
                .as_deref()
                .is_none_or(|c| task.category.as_deref() == Some(c))
            && self
                .assignee
                .as_deref()
                .is_none_or(|a| task.assignee.as_deref() == Some(a))
    }
}
