// src/store/mod.rs

//! Task store: the canonical set of task records.
//!
//! The store is the only place that mints task ids and the only place that
//! mutates a `Task`. It never reads the clock itself; callers pass `now`.

pub mod task_store;

pub use task_store::{StoreOptions, TaskStore};
