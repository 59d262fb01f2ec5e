// src/persist.rs

//! Snapshot persistence on top of a [`FileSystem`].
//!
//! The scheduler itself does no I/O; the application loads a snapshot at
//! startup and saves one after mutating commands through this module.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::snapshot::SnapshotDocument;

#[derive(Debug, Clone)]
pub struct SnapshotFile<F: FileSystem> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> SnapshotFile<F> {
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored snapshot, or `None` if nothing has been saved yet.
    pub fn load(&self) -> Result<Option<SnapshotDocument>> {
        if !self.fs.exists(&self.path) {
            debug!(path = %self.path.display(), "no snapshot file yet");
            return Ok(None);
        }
        let text = self.fs.read_to_string(&self.path)?;
        let doc = SnapshotDocument::from_json(&text)?;
        debug!(
            path = %self.path.display(),
            tasks = doc.tasks.len(),
            dependencies = doc.dependencies.len(),
            "loaded snapshot file"
        );
        Ok(Some(doc))
    }

    /// Write `doc`, going through a temporary file so a crash mid-write
    /// never leaves a truncated snapshot behind.
    pub fn save(&self, doc: &SnapshotDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                self.fs.create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let json = doc.to_json_pretty()?;
        self.fs.write(&tmp, json.as_bytes())?;
        self.fs.rename(&tmp, &self.path)?;

        info!(
            path = %self.path.display(),
            tasks = doc.tasks.len(),
            dependencies = doc.dependencies.len(),
            "saved snapshot file"
        );
        Ok(())
    }
}
