// src/commands.rs

//! Executes one parsed CLI [`Command`] against a running scheduler and
//! renders the result.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use serde::Serialize;
use tracing::debug;

use crate::blocked::BlockedTask;
use crate::cli::{context_from_entries, Command, DepCommand, OriginArgs};
use crate::engine::SchedulerHandle;
use crate::fs::{FileSystem, RealFileSystem};
use crate::model::{
    Dependency, Origin, Task, TaskFilter, TaskId, TaskSpec, TaskUpdate,
};
use crate::persist::SnapshotFile;
use crate::ready::{ReadyFilter, ReadyWorkItem};
use crate::scheduler::{ImportSummary, SchedulerStats, TaskDetail};
use crate::snapshot::SnapshotDocument;

/// What a command produced. Serializes to the bare payload for `--json`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Output {
    Task(Task),
    Detail(TaskDetail),
    Tasks(Vec<Task>),
    Dependency(Dependency),
    Removed { removed: bool },
    Ready(Vec<ReadyWorkItem>),
    Blocked(Vec<BlockedTask>),
    Snapshot(SnapshotDocument),
    Exported { path: PathBuf, tasks: usize, dependencies: usize },
    Imported(ImportSummary),
    Stats(SchedulerStats),
    Cycles(Vec<Vec<TaskId>>),
}

fn origin_from(args: &OriginArgs) -> Origin {
    let origin = args
        .source
        .as_deref()
        .map(Origin::new)
        .unwrap_or_default();
    match &args.session {
        Some(session) => origin.with_session(session.clone()),
        None => origin,
    }
}

/// Run `command` through `handle`.
pub async fn execute(handle: &SchedulerHandle, command: &Command) -> anyhow::Result<Output> {
    debug!(?command, "executing command");

    let output = match command {
        Command::Create(args) => {
            let spec = TaskSpec {
                title: args.title.clone(),
                description: args.description.clone(),
                priority: args.priority.unwrap_or_default(),
                task_type: args.task_type.unwrap_or_default(),
                assignee: args.assignee.clone(),
                labels: args.labels.clone(),
                category: args.category.clone(),
                external_ref: args.external_ref.clone(),
                context: context_from_entries(&args.context),
            };
            Output::Task(handle.create_task(spec, origin_from(&args.origin)).await?)
        }
        Command::Update(args) => {
            let labels = if args.clear_labels {
                Some(Vec::new())
            } else if args.labels.is_empty() {
                None
            } else {
                Some(args.labels.clone())
            };
            let update = TaskUpdate {
                status: args.status,
                priority: args.priority,
                assignee: args.assignee.clone(),
                labels,
                context: (!args.context.is_empty()).then(|| context_from_entries(&args.context)),
            };
            Output::Task(handle.update_task(args.id.clone(), update).await?)
        }
        Command::Show { id } => Output::Detail(handle.task_detail(id.clone()).await?),
        Command::List(args) => {
            let filter = TaskFilter {
                status: args.status,
                priority: args.priority,
                assignee: args.assignee.clone(),
                category: args.category.clone(),
                task_type: args.task_type,
                limit: args.limit,
            };
            Output::Tasks(handle.list_tasks(filter).await?)
        }
        Command::Dep(DepCommand::Add {
            dependent,
            blocker,
            dependency_type,
            note,
        }) => Output::Dependency(
            handle
                .add_dependency(dependent.clone(), blocker.clone(), *dependency_type, note.clone())
                .await?,
        ),
        Command::Dep(DepCommand::Remove { dependent, blocker }) => Output::Removed {
            removed: handle
                .remove_dependency(dependent.clone(), blocker.clone())
                .await?,
        },
        Command::Ready(args) => {
            // Only build an override when a flag asks for one.
            let config = if args.limit.is_some() || args.sort.is_some() {
                let mut cfg = handle.ready_config().await?;
                if let Some(limit) = args.limit {
                    cfg = cfg.with_max_items(limit);
                }
                if let Some(sort) = args.sort {
                    cfg = cfg.with_strategy(sort);
                }
                Some(cfg)
            } else {
                None
            };
            let filter = ReadyFilter {
                category: args.category.clone(),
                assignee: args.assignee.clone(),
                priority: args.priority,
            };
            Output::Ready(handle.ready_work(config, filter).await?)
        }
        Command::Blocked => Output::Blocked(handle.blocked_tasks().await?),
        Command::Batch(args) => {
            let text = RealFileSystem
                .read_to_string(&args.file)
                .with_context(|| format!("reading batch file {}", args.file.display()))?;
            let specs: Vec<TaskSpec> = serde_json::from_str(&text)
                .with_context(|| format!("parsing batch file {}", args.file.display()))?;
            Output::Tasks(
                handle
                    .batch_create_tasks(specs, origin_from(&args.origin), args.parent.clone())
                    .await?,
            )
        }
        Command::Export { file: None } => Output::Snapshot(handle.export().await?),
        Command::Export { file: Some(path) } => {
            let doc = handle.export().await?;
            SnapshotFile::new(RealFileSystem, path).save(&doc)?;
            Output::Exported {
                path: path.clone(),
                tasks: doc.tasks.len(),
                dependencies: doc.dependencies.len(),
            }
        }
        Command::Import { file } => {
            let doc = SnapshotFile::new(RealFileSystem, file)
                .load()?
                .ok_or_else(|| anyhow::anyhow!("snapshot file not found: {}", file.display()))?;
            Output::Imported(handle.import(doc).await?)
        }
        Command::Stats => Output::Stats(handle.stats().await?),
        Command::Cycles => Output::Cycles(handle.blocking_cycles().await?),
    };

    Ok(output)
}

impl Output {
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text rendering for terminals.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut out = String::new();
        match self {
            Output::Task(task) => write_task_line(&mut out, task),
            Output::Detail(detail) => {
                let t = &detail.task;
                let _ = writeln!(out, "{} {}", t.id, t.title);
                let _ = writeln!(out, "  status:   {}", t.status);
                let _ = writeln!(out, "  priority: {}", t.priority);
                let _ = writeln!(out, "  type:     {}", t.task_type);
                if let Some(a) = &t.assignee {
                    let _ = writeln!(out, "  assignee: {a}");
                }
                if !t.labels.is_empty() {
                    let labels: Vec<_> = t.labels.iter().map(String::as_str).collect();
                    let _ = writeln!(out, "  labels:   {}", labels.join(", "));
                }
                let _ = writeln!(out, "  source:   {}", t.source);
                let _ = writeln!(out, "  created:  {}", t.created_at.to_rfc3339());
                if let Some(done) = t.completed_at {
                    let _ = writeln!(out, "  done:     {}", done.to_rfc3339());
                }
                if let Some(d) = &t.description {
                    let _ = writeln!(out, "\n{d}\n");
                }
                if detail.dependencies.is_empty() {
                    let _ = writeln!(out, "  no dependencies");
                }
                for dep in &detail.dependencies {
                    let _ = writeln!(
                        out,
                        "  {} {} -[{}]-> {}",
                        dep.id, dep.dependent_id, dep.dependency_type, dep.blocker_id
                    );
                }
                if !detail.blockers.is_empty() {
                    let ids: Vec<_> = detail.blockers.iter().map(String::as_str).collect();
                    let _ = writeln!(out, "  blocked by: {}", ids.join(", "));
                }
            }
            Output::Tasks(tasks) => {
                if tasks.is_empty() {
                    out.push_str("no tasks\n");
                }
                for t in tasks {
                    write_task_line(&mut out, t);
                }
            }
            Output::Dependency(dep) => {
                let _ = writeln!(
                    out,
                    "{}: {} now depends on {} ({})",
                    dep.id, dep.dependent_id, dep.blocker_id, dep.dependency_type
                );
            }
            Output::Removed { removed } => {
                out.push_str(if *removed {
                    "dependency removed\n"
                } else {
                    "no matching dependency\n"
                });
            }
            Output::Ready(items) => {
                if items.is_empty() {
                    out.push_str("no ready work\n");
                }
                for (rank, item) in items.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "{:>3}. {:<10} score {:>6.2}  unblocks {:<3} {} [{}]",
                        rank + 1,
                        item.task.id,
                        item.priority_score,
                        item.blocking_count,
                        item.task.title,
                        item.task.task_type,
                    );
                }
            }
            Output::Blocked(blocked) => {
                if blocked.is_empty() {
                    out.push_str("nothing is blocked\n");
                }
                for b in blocked {
                    let ids: Vec<_> = b.blockers.iter().map(String::as_str).collect();
                    let _ = writeln!(
                        out,
                        "{:<10} {} (waiting on {})",
                        b.task.id,
                        b.task.title,
                        ids.join(", ")
                    );
                }
            }
            Output::Snapshot(doc) => {
                // Export to stdout is always JSON.
                out = doc.to_json_pretty()?;
                out.push('\n');
            }
            Output::Exported {
                path,
                tasks,
                dependencies,
            } => {
                let _ = writeln!(
                    out,
                    "exported {tasks} tasks and {dependencies} dependencies to {}",
                    path.display()
                );
            }
            Output::Imported(summary) => {
                let _ = writeln!(
                    out,
                    "imported {} tasks and {} dependencies",
                    summary.tasks, summary.dependencies
                );
            }
            Output::Stats(s) => {
                let _ = writeln!(out, "tasks:        {}", s.total_tasks);
                let _ = writeln!(out, "  open:         {}", s.open_tasks);
                let _ = writeln!(out, "  in progress:  {}", s.in_progress_tasks);
                let _ = writeln!(out, "  blocked:      {}", s.blocked_status_tasks);
                let _ = writeln!(out, "  completed:    {}", s.completed_tasks);
                let _ = writeln!(out, "  cancelled:    {}", s.cancelled_tasks);
                let _ = writeln!(out, "ready:        {}", s.ready_tasks);
                let _ = writeln!(out, "waiting:      {}", s.blocked_tasks);
                let _ = writeln!(out, "dependencies: {}", s.dependencies);
                if let Some(h) = s.avg_completion_hours {
                    let _ = writeln!(out, "avg hours to complete: {h:.1}");
                }
            }
            Output::Cycles(cycles) => {
                if cycles.is_empty() {
                    out.push_str("no blocking cycles\n");
                }
                for cycle in cycles {
                    let _ = writeln!(out, "cycle: {}", cycle.join(" <-> "));
                }
            }
        }
        Ok(out)
    }
}

fn write_task_line(out: &mut String, t: &Task) {
    let _ = writeln!(
        out,
        "{:<10} {:<11} P{} {:<8} {}",
        t.id,
        t.status.as_str(),
        t.priority.value(),
        t.task_type.as_str(),
        t.title
    );
}
