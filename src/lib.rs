// src/lib.rs

pub mod blocked;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod model;
pub mod persist;
pub mod ready;
pub mod scheduler;
pub mod snapshot;
pub mod store;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_or_default;
use crate::engine::DEFAULT_CHANNEL_CAPACITY;
use crate::fs::RealFileSystem;
use crate::persist::SnapshotFile;
use crate::scheduler::Scheduler;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - restoring state from the snapshot file
/// - the scheduler runtime and a handle to it
/// - running one command and printing its output
/// - saving state again when the command changed it
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref())?;
    let state_path = args
        .state
        .clone()
        .unwrap_or_else(|| cfg.snapshot.path.clone());
    let state = SnapshotFile::new(RealFileSystem, state_path);

    let mut scheduler = Scheduler::from_config(&cfg);
    if let Some(doc) = state.load()? {
        scheduler.import(doc)?;
    }

    let (handle, join) = engine::spawn(scheduler, DEFAULT_CHANNEL_CAPACITY);

    let outcome = commands::execute(&handle, &args.command).await;

    handle.shutdown().await?;
    let scheduler = join.await?;
    let output = outcome?;

    if args.command.is_mutation() {
        state.save(&scheduler.export())?;
    } else {
        debug!("read-only command; snapshot not rewritten");
    }

    let text = if args.json {
        output.to_json()? + "\n"
    } else {
        output.render()?
    };
    print!("{text}");

    info!("done");
    Ok(())
}
