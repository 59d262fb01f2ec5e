// src/clock/mod.rs

use std::fmt::Debug;

use chrono::{DateTime, Utc};

pub mod mock;

pub use mock::MockClock;

/// Source of "now" for timestamps and task age.
///
/// The scheduler never calls `Utc::now()` directly, so tests can pin time
/// with [`MockClock`].
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Implementation backed by the system clock.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
