use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Ordering applied to ready work before truncation.
///
/// - `Hybrid`: highest priority score first (default).
/// - `Priority`: most urgent priority level first, ties broken by score.
/// - `Oldest`: earliest created first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    Hybrid,
    Priority,
    Oldest,
}

impl Default for SortStrategy {
    fn default() -> Self {
        SortStrategy::Hybrid
    }
}

impl SortStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortStrategy::Hybrid => "hybrid",
            SortStrategy::Priority => "priority",
            SortStrategy::Oldest => "oldest",
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
