// src/snapshot/mod.rs

//! Export/import of the full scheduler state.
//!
//! - [`document`] defines the versioned, serializable document.
//! - [`validate`] checks a document against the live state before import,
//!   so a bad document is rejected whole and nothing is half-applied.

pub mod document;
pub mod validate;

pub use document::{SnapshotDocument, SCHEMA_VERSION};
pub use validate::validate_snapshot;
