// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::{Context, DependencyType, TaskPriority, TaskStatus, TaskType};
use crate::types::SortStrategy;

/// Command-line arguments for `readywork`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "readywork",
    version,
    about = "Track tasks and their dependencies, and pick what is ready to work on.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Readywork.toml` in the current working directory, or
    /// built-in defaults when that file does not exist.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file holding tasks and dependencies between runs.
    ///
    /// Overrides `[snapshot] path` from the config file.
    #[arg(long, value_name = "PATH", global = true)]
    pub state: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `READYWORK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a task.
    Create(CreateArgs),
    /// Change status, priority, assignee, labels or context of a task.
    Update(UpdateArgs),
    /// Show a task with its dependencies and active blockers.
    Show { id: String },
    /// List tasks, newest first.
    List(ListArgs),
    /// Add or remove dependencies.
    #[command(subcommand)]
    Dep(DepCommand),
    /// Ranked list of tasks that can be started now.
    Ready(ReadyArgs),
    /// Unfinished tasks waiting on at least one blocker.
    Blocked,
    /// Create tasks from a JSON array of task specs.
    Batch(BatchArgs),
    /// Write a snapshot to FILE, or to stdout.
    Export { file: Option<PathBuf> },
    /// Merge a snapshot file into the current state.
    Import { file: PathBuf },
    /// Aggregate counts.
    Stats,
    /// Groups of tasks that block each other and can never become ready.
    Cycles,
}

impl Command {
    /// Whether the command can change state, so the snapshot must be saved.
    pub fn is_mutation(&self) -> bool {
        match self {
            Command::Create(_)
            | Command::Update(_)
            | Command::Dep(_)
            | Command::Batch(_)
            | Command::Import { .. } => true,
            Command::Show { .. }
            | Command::List(_)
            | Command::Ready(_)
            | Command::Blocked
            | Command::Export { .. }
            | Command::Stats
            | Command::Cycles => false,
        }
    }
}

/// Who is creating tasks.
#[derive(Debug, Clone, Default, Args)]
pub struct OriginArgs {
    /// Creator recorded on new tasks (default "agent").
    #[arg(long, value_name = "NAME")]
    pub source: Option<String>,

    /// Working session recorded on new tasks.
    #[arg(long, value_name = "ID")]
    pub session: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    pub title: String,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// 0-4, p0-p4 or critical/high/medium/low/backlog.
    #[arg(long, short = 'p')]
    pub priority: Option<TaskPriority>,

    #[arg(long = "type", short = 't', value_name = "TYPE", value_enum, ignore_case = true)]
    pub task_type: Option<TaskType>,

    #[arg(long)]
    pub assignee: Option<String>,

    /// Repeatable.
    #[arg(long = "label", short = 'l', value_name = "LABEL")]
    pub labels: Vec<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, value_name = "REF")]
    pub external_ref: Option<String>,

    /// KEY=VALUE, VALUE parsed as JSON when possible. Repeatable.
    #[arg(long = "context", value_name = "KEY=VALUE", value_parser = parse_context_entry)]
    pub context: Vec<(String, serde_json::Value)>,

    #[command(flatten)]
    pub origin: OriginArgs,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    pub id: String,

    #[arg(long, short = 's', value_enum, ignore_case = true)]
    pub status: Option<TaskStatus>,

    #[arg(long, short = 'p')]
    pub priority: Option<TaskPriority>,

    #[arg(long)]
    pub assignee: Option<String>,

    /// Replaces the label set. Repeatable.
    #[arg(long = "label", short = 'l', value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Remove all labels.
    #[arg(long, conflicts_with = "labels")]
    pub clear_labels: bool,

    /// KEY=VALUE merged into the task context. Repeatable.
    #[arg(long = "context", value_name = "KEY=VALUE", value_parser = parse_context_entry)]
    pub context: Vec<(String, serde_json::Value)>,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[arg(long, short = 's', value_enum, ignore_case = true)]
    pub status: Option<TaskStatus>,

    #[arg(long, short = 'p')]
    pub priority: Option<TaskPriority>,

    #[arg(long)]
    pub assignee: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long = "type", short = 't', value_name = "TYPE", value_enum, ignore_case = true)]
    pub task_type: Option<TaskType>,

    #[arg(long, default_value_t = crate::model::TaskFilter::DEFAULT_LIMIT)]
    pub limit: usize,
}

#[derive(Debug, Clone, Subcommand)]
pub enum DepCommand {
    /// DEPENDENT depends on BLOCKER.
    Add {
        dependent: String,
        blocker: String,

        #[arg(
            long = "type",
            short = 't',
            value_enum,
            ignore_case = true,
            default_value_t = DependencyType::Blocks,
            value_name = "TYPE"
        )]
        dependency_type: DependencyType,

        #[arg(long)]
        note: Option<String>,
    },
    /// Remove every dependency of DEPENDENT on BLOCKER.
    Remove { dependent: String, blocker: String },
}

#[derive(Debug, Clone, Args)]
pub struct ReadyArgs {
    /// Maximum number of items (default from config).
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Default from config.
    #[arg(long, value_enum, ignore_case = true)]
    pub sort: Option<SortStrategy>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub assignee: Option<String>,

    #[arg(long, short = 'p')]
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// JSON file with an array of task specs.
    pub file: PathBuf,

    /// Link every new task to this task as discovered from it.
    #[arg(long, value_name = "ID")]
    pub parent: Option<String>,

    #[command(flatten)]
    pub origin: OriginArgs,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Parse `KEY=VALUE`; VALUE becomes JSON if it parses, a string otherwise.
pub fn parse_context_entry(s: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty context key in {s:?}"));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub fn context_from_entries(entries: &[(String, serde_json::Value)]) -> Context {
    entries.iter().cloned().collect()
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_dep_add_with_type() {
        let args = CliArgs::try_parse_from([
            "readywork",
            "--json",
            "dep",
            "add",
            "task-2",
            "task-1",
            "--type",
            "discovered-from",
        ])
        .unwrap();
        assert!(args.json);
        match args.command {
            Command::Dep(DepCommand::Add {
                dependent,
                blocker,
                dependency_type,
                ..
            }) => {
                assert_eq!(dependent, "task-2");
                assert_eq!(blocker, "task-1");
                assert_eq!(dependency_type, DependencyType::DiscoveredFrom);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_create_options() {
        let args = CliArgs::try_parse_from([
            "readywork",
            "create",
            "Fix login bug",
            "-p",
            "p1",
            "--type",
            "bug",
            "-l",
            "auth",
            "--context",
            "attempts=3",
        ])
        .unwrap();
        let Command::Create(create) = args.command else {
            panic!("expected create");
        };
        assert_eq!(create.priority, Some(TaskPriority::High));
        assert_eq!(create.task_type, Some(TaskType::Bug));
        assert_eq!(create.labels, vec!["auth".to_string()]);
        assert_eq!(create.context, vec![("attempts".to_string(), serde_json::json!(3))]);
    }

    #[test]
    fn enum_flags_ignore_case() {
        let args = CliArgs::try_parse_from([
            "readywork", "list", "-s", "IN_PROGRESS", "--type", "Content_Review",
        ])
        .unwrap();
        let Command::List(list) = args.command else {
            panic!("expected list");
        };
        assert_eq!(list.status, Some(TaskStatus::InProgress));
        assert_eq!(list.task_type, Some(TaskType::ContentReview));

        let args = CliArgs::try_parse_from(["readywork", "ready", "--sort", "Oldest"]).unwrap();
        let Command::Ready(ready) = args.command else {
            panic!("expected ready");
        };
        assert_eq!(ready.sort, Some(SortStrategy::Oldest));
        assert!(CliArgs::try_parse_from(["readywork", "list", "-s", "done"]).is_err());
    }

    #[test]
    fn rejects_bad_priority() {
        assert!(CliArgs::try_parse_from(["readywork", "create", "x", "-p", "9"]).is_err());
    }

    #[test]
    fn context_entries_fall_back_to_strings() {
        assert_eq!(
            parse_context_entry("owner=alice").unwrap(),
            ("owner".to_string(), serde_json::json!("alice"))
        );
        assert!(parse_context_entry("novalue").is_err());
        assert!(parse_context_entry("=1").is_err());
    }
}
