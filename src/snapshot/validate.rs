// src/snapshot/validate.rs

//! Semantic checks run on a snapshot before any of it is applied.

use std::collections::HashSet;

use crate::dag::DependencyGraph;
use crate::errors::{ReadyworkError, Result};
use crate::model::TaskStatus;
use crate::snapshot::document::{SnapshotDocument, SCHEMA_VERSION};
use crate::store::task_store::validate_title;
use crate::store::TaskStore;

/// Check that `doc` can be merged into `store` + `graph` without breaking
/// any invariant. Nothing is mutated.
pub fn validate_snapshot(
    doc: &SnapshotDocument,
    store: &TaskStore,
    graph: &DependencyGraph,
) -> Result<()> {
    validate_schema_version(&doc.schema_version)?;
    validate_tasks(doc, store)?;
    validate_dependencies(doc, store, graph)?;
    Ok(())
}

fn malformed(msg: String) -> ReadyworkError {
    ReadyworkError::MalformedSnapshot(msg)
}

fn validate_schema_version(version: &str) -> Result<()> {
    let major = |v: &str| v.split('.').next().map(str::to_string);
    if major(version) != major(SCHEMA_VERSION) {
        return Err(malformed(format!(
            "unsupported schema_version '{version}' (expected {SCHEMA_VERSION})"
        )));
    }
    Ok(())
}

fn validate_tasks(doc: &SnapshotDocument, store: &TaskStore) -> Result<()> {
    let max_title_len = store.options().max_title_len;

    for (key, task) in doc.tasks.iter() {
        if key != &task.id {
            return Err(malformed(format!(
                "task stored under '{key}' has id '{}'",
                task.id
            )));
        }
        validate_title(&task.title, max_title_len)
            .map_err(|e| malformed(format!("task '{key}': {e}")))?;

        let completed = task.status == TaskStatus::Completed;
        if completed != task.completed_at.is_some() {
            return Err(malformed(format!(
                "task '{key}': completed_at must be set exactly when status is completed (status = {})",
                task.status
            )));
        }
        if task.updated_at < task.created_at {
            return Err(malformed(format!(
                "task '{key}': updated_at is earlier than created_at"
            )));
        }
    }
    Ok(())
}

fn validate_dependencies(
    doc: &SnapshotDocument,
    store: &TaskStore,
    graph: &DependencyGraph,
) -> Result<()> {
    let task_exists = |id: &str| doc.tasks.contains_key(id) || store.contains(id);

    // Existing edges that the document does not overwrite stay in place,
    // so duplicates are checked against them too.
    let mut seen: HashSet<(&str, &str, _)> = graph
        .iter()
        .filter(|d| !doc.dependencies.contains_key(&d.id))
        .map(|d| (d.dependent_id.as_str(), d.blocker_id.as_str(), d.dependency_type))
        .collect();

    for (key, dep) in doc.dependencies.iter() {
        if key != &dep.id {
            return Err(malformed(format!(
                "dependency stored under '{key}' has id '{}'",
                dep.id
            )));
        }
        if !task_exists(&dep.dependent_id) {
            return Err(malformed(format!(
                "dependency '{key}' references unknown dependent '{}'",
                dep.dependent_id
            )));
        }
        if !task_exists(&dep.blocker_id) {
            return Err(malformed(format!(
                "dependency '{key}' references unknown blocker '{}'",
                dep.blocker_id
            )));
        }
        if dep.dependent_id == dep.blocker_id {
            return Err(malformed(format!(
                "dependency '{key}' points task '{}' at itself",
                dep.dependent_id
            )));
        }
        if !seen.insert((dep.dependent_id.as_str(), dep.blocker_id.as_str(), dep.dependency_type)) {
            return Err(malformed(format!(
                "dependency '{key}' duplicates an existing {} edge {} -> {}",
                dep.dependency_type, dep.dependent_id, dep.blocker_id
            )));
        }
    }
    Ok(())
}
