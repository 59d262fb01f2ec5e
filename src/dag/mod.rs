// src/dag/mod.rs

//! Dependency graph and blocking semantics.
//!
//! - [`graph`] owns the typed edges and their adjacency indices.
//! - [`blocking`] answers blocker / dependent questions against a store.
//! - [`cycles`] finds groups of tasks that block each other forever.

pub mod blocking;
pub mod cycles;
pub mod graph;

pub use blocking::BlockingView;
pub use cycles::{blocking_cycles, would_close_cycle};
pub use graph::DependencyGraph;
