#![allow(dead_code)]
#![allow(unused_imports)]

use std::io::Write;

use tempfile::NamedTempFile;

pub use readywork_test_utils::builders::{SchedulerFixture, TaskSpecBuilder};
pub use readywork_test_utils::init_tracing;

/// Write `contents` to a fresh temporary file that lives as long as the
/// returned handle.
pub fn temp_file_with(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    write!(file, "{contents}").expect("write temp file");
    file
}

/// Ids of `items`, in order.
pub fn ids<'a>(items: impl IntoIterator<Item = &'a readywork::model::Task>) -> Vec<String> {
    items.into_iter().map(|t| t.id.clone()).collect()
}
