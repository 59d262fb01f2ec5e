// src/model/mod.rs

//! Domain records shared by every component.
//!
//! - [`task`] holds the `Task` record and the input/update/filter types
//!   used to create, change and query tasks.
//! - [`dependency`] holds the typed edge between two tasks.
//! - [`enums`] holds the closed status/priority/type enums.
//! - [`ids`] formats and parses sequence ids.

pub mod dependency;
pub mod enums;
pub mod ids;
pub mod task;

pub use dependency::{Dependency, DependencyId};
pub use enums::{DependencyType, TaskPriority, TaskStatus, TaskType};
pub use task::{Context, Origin, Task, TaskFilter, TaskId, TaskSpec, TaskUpdate};
