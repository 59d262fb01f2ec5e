// src/ready/mod.rs

//! Ready-work detection: which unfinished tasks have nothing blocking them,
//! and in which order they should be picked up.

pub mod config;
pub mod engine;
pub mod score;

pub use config::{ReadyFilter, ReadyWorkConfig};
pub use engine::{ready_work, ReadyWorkItem};
pub use score::priority_score;
