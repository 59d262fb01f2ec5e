// tests/snapshot_files.rs

mod common;

use common::{init_tracing, temp_file_with, SchedulerFixture};
use readywork::errors::ReadyworkError;
use readywork::fs::RealFileSystem;
use readywork::model::TaskStatus;
use readywork::persist::SnapshotFile;
use readywork::snapshot::SnapshotDocument;
use tempfile::TempDir;

#[test]
fn state_survives_a_save_and_load_cycle() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let mut fx = SchedulerFixture::new();
    let a = fx.create("a");
    let b = fx.create("b");
    fx.block(&b.id, &a.id);
    fx.complete(&a.id);

    let file = SnapshotFile::new(RealFileSystem, &path);
    file.save(&fx.scheduler.export()).unwrap();
    assert!(path.is_file());
    assert!(!path.with_extension("json.tmp").exists());

    let loaded = file.load().unwrap().expect("snapshot present");
    let mut restored = SchedulerFixture::new();
    restored.scheduler.import(loaded).unwrap();

    assert_eq!(restored.ready_ids(), vec![b.id.clone()]);
    assert_eq!(
        restored.scheduler.get_task(&a.id).unwrap().status,
        TaskStatus::Completed
    );
    // Ids keep counting from where the saved state left off.
    assert_eq!(restored.create("c").id, "task-3");
}

#[test]
fn missing_file_loads_as_nothing() {
    let dir = TempDir::new().unwrap();
    let file = SnapshotFile::new(RealFileSystem, dir.path().join("absent.json"));
    assert!(file.load().unwrap().is_none());
}

#[test]
fn garbage_file_is_a_malformed_snapshot() {
    let file = temp_file_with("{ not json");
    let err = SnapshotFile::new(RealFileSystem, file.path())
        .load()
        .unwrap_err();
    assert!(matches!(err, ReadyworkError::MalformedSnapshot(_)));
}

#[test]
fn dangling_dependency_rejects_whole_import() {
    init_tracing();
    let json = r#"{
        "tasks": {
            "task-1": {
                "id": "task-1",
                "title": "kept out",
                "status": "open",
                "priority": 2,
                "task_type": "task",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }
        },
        "dependencies": {
            "dep-1": {
                "id": "dep-1",
                "dependent_id": "task-1",
                "blocker_id": "task-404",
                "dependency_type": "blocks",
                "created_at": "2024-01-01T00:00:00Z"
            }
        },
        "exported_at": "2024-01-01T00:00:00Z",
        "schema_version": "1.0"
    }"#;
    let doc = SnapshotDocument::from_json(json).unwrap();

    let mut fx = SchedulerFixture::new();
    let err = fx.scheduler.import(doc).unwrap_err();
    assert!(matches!(err, ReadyworkError::MalformedSnapshot(msg) if msg.contains("task-404")));
    assert!(fx.scheduler.store().is_empty());
    assert!(fx.scheduler.graph().is_empty());
}

#[test]
fn legacy_version_key_is_accepted() {
    let json = r#"{"tasks": {}, "dependencies": {}, "exported_at": "2024-01-01T00:00:00Z", "version": "1.0"}"#;
    let doc = SnapshotDocument::from_json(json).unwrap();
    assert_eq!(doc.schema_version, "1.0");

    let mut fx = SchedulerFixture::new();
    let summary = fx.scheduler.import(doc).unwrap();
    assert_eq!(summary.tasks, 0);
}

#[test]
fn future_major_version_is_refused() {
    let json = r#"{"tasks": {}, "dependencies": {}, "exported_at": "2024-01-01T00:00:00Z", "schema_version": "2.0"}"#;
    let doc = SnapshotDocument::from_json(json).unwrap();
    let mut fx = SchedulerFixture::new();
    assert!(matches!(
        fx.scheduler.import(doc),
        Err(ReadyworkError::MalformedSnapshot(_))
    ));
}
