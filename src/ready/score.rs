// src/ready/score.rs

//! Priority score used to rank ready work.
//!
//! ```text
//! base  = 10 - 2 * priority          (critical = 10 .. backlog = 2)
//! base += min(5, age / threshold)    only once age > threshold
//! base += type boost                 (bug +3 .. chore -1)
//! score = max(0, base)
//! ```

use chrono::{DateTime, Utc};

use crate::model::Task;

/// Upper bound on the age boost.
pub const MAX_AGE_BOOST: f64 = 5.0;

pub fn age_hours(task: &Task, now: DateTime<Utc>) -> f64 {
    (now - task.created_at).num_milliseconds() as f64 / 3_600_000.0
}

pub fn age_boost(age_hours: f64, threshold_hours: f64) -> f64 {
    if age_hours > threshold_hours {
        (age_hours / threshold_hours).min(MAX_AGE_BOOST)
    } else {
        0.0
    }
}

pub fn priority_score(task: &Task, now: DateTime<Utc>, threshold_hours: f64) -> f64 {
    let mut score = 10.0 - f64::from(task.priority.value()) * 2.0;
    score += age_boost(age_hours(task, now), threshold_hours);
    score += task.task_type.score_boost();
    score.max(0.0)
}
