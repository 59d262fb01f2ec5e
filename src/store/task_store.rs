// src/store/task_store.rs

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{ReadyworkError, Result};
use crate::model::ids::{format_id, next_sequence, parse_sequence};
use crate::model::{Origin, Task, TaskFilter, TaskId, TaskSpec, TaskStatus, TaskUpdate};

/// Knobs for id minting and title validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub id_prefix: String,
    pub max_title_len: usize,
}

impl StoreOptions {
    pub const DEFAULT_PREFIX: &'static str = "task";
    pub const DEFAULT_MAX_TITLE_LEN: usize = 200;
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            id_prefix: Self::DEFAULT_PREFIX.to_string(),
            max_title_len: Self::DEFAULT_MAX_TITLE_LEN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: HashMap<TaskId, Task>,
    options: StoreOptions,
    /// Sequence number the next created task receives.
    next_seq: u64,
}

impl TaskStore {
    pub fn new(options: StoreOptions) -> Self {
        Self {
            tasks: HashMap::new(),
            options,
            next_seq: 1,
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn next_sequence(&self) -> u64 {
        self.next_seq
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Result<&Task> {
        self.tasks
            .get(id)
            .ok_or_else(|| ReadyworkError::NotFound(id.to_string()))
    }

    /// Status of a task, or `None` if unknown.
    pub fn status_of(&self, id: &str) -> Option<TaskStatus> {
        self.tasks.get(id).map(|t| t.status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Sequence number encoded in `id`, if it carries this store's prefix.
    pub fn sequence_of(&self, id: &str) -> Option<u64> {
        parse_sequence(&self.options.id_prefix, id)
    }

    /// Check the shape of a spec without touching the store.
    pub fn validate_spec(&self, spec: &TaskSpec) -> Result<()> {
        validate_title(&spec.title, self.options.max_title_len)
    }

    pub fn create(&mut self, spec: TaskSpec, origin: &Origin, now: DateTime<Utc>) -> Result<Task> {
        self.validate_spec(&spec)?;

        let id = format_id(&self.options.id_prefix, self.next_seq);
        debug_assert!(
            !self.tasks.contains_key(&id),
            "sequence counter produced an id that is already taken: {id}"
        );
        self.next_seq += 1;

        let task = Task {
            id: id.clone(),
            title: spec.title.trim().to_string(),
            description: spec.description,
            status: TaskStatus::Open,
            priority: spec.priority,
            task_type: spec.task_type,
            assignee: spec.assignee,
            labels: clean_labels(spec.labels),
            source: origin.source.clone(),
            category: spec.category,
            external_ref: spec.external_ref,
            created_at: now,
            updated_at: now,
            completed_at: None,
            session_id: origin.session_id.clone(),
            context: spec.context,
        };

        info!(
            task = %task.id,
            priority = task.priority.value(),
            task_type = %task.task_type,
            "created task"
        );
        self.tasks.insert(id, task.clone());
        Ok(task)
    }

    /// Apply a partial update.
    ///
    /// `completed_at` is stamped when the status first becomes `Completed`
    /// and cleared when a completed task is reopened.
    pub fn update(&mut self, id: &str, update: TaskUpdate, now: DateTime<Utc>) -> Result<Task> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| ReadyworkError::NotFound(id.to_string()))?;

        task.updated_at = now.max(task.created_at);

        if let Some(status) = update.status {
            let previous = task.status;
            task.status = status;
            match (previous == TaskStatus::Completed, status == TaskStatus::Completed) {
                (false, true) => task.completed_at = Some(task.updated_at),
                (true, false) => task.completed_at = None,
                _ => {}
            }
            if previous != status {
                info!(task = %id, from = %previous, to = %status, "task status changed");
            }
        }

        if let Some(priority) = update.priority {
            task.priority = priority;
        }

        if let Some(assignee) = update.assignee {
            task.assignee = Some(assignee);
        }

        if let Some(labels) = update.labels {
            task.labels = clean_labels(labels);
        }

        if let Some(context) = update.context {
            task.context.extend(context);
        }

        debug!(task = %id, "task updated");
        Ok(task.clone())
    }

    /// Tasks matching `filter`, newest first, truncated to `filter.limit`.
    pub fn list(&self, filter: &TaskFilter) -> Vec<Task> {
        let mut tasks: Vec<&Task> = self.tasks.values().filter(|t| filter.matches(t)).collect();
        tasks.sort_by_key(|t| Reverse((t.created_at, self.sequence_of(&t.id), t.id.clone())));
        tasks.into_iter().take(filter.limit).cloned().collect()
    }

    /// Insert or overwrite records wholesale, then re-derive the sequence
    /// counter from every id now present.
    ///
    /// Callers are expected to have validated the records already.
    pub fn upsert_all(&mut self, tasks: impl IntoIterator<Item = Task>) {
        for task in tasks {
            self.tasks.insert(task.id.clone(), task);
        }
        self.next_seq = next_sequence(
            &self.options.id_prefix,
            self.tasks.keys().map(String::as_str),
        );
        debug!(next_seq = self.next_seq, "recomputed task sequence counter");
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}

/// Titles must be non-blank and at most `max_len` characters.
pub fn validate_title(title: &str, max_len: usize) -> Result<()> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ReadyworkError::InvalidTask("title must not be empty".to_string()));
    }
    let len = trimmed.chars().count();
    if len > max_len {
        return Err(ReadyworkError::InvalidTask(format!(
            "title is {len} characters long (max {max_len})"
        )));
    }
    Ok(())
}

fn clean_labels(labels: Vec<String>) -> std::collections::BTreeSet<String> {
    labels
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}
