use anim_loader::{
    services::{file_importer::ImportError, PathPicker},
    FileImporter, MemoryStore, PickerRegistry, StorageKeys,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_trigger_pick_without_control() {
    let store = Arc::new(MemoryStore::new());
    let importer = FileImporter::new(store.clone(), StorageKeys::default());

    let result = importer.trigger_pick().await;

    match result {
        Err(ImportError::MissingControl(id)) => assert_eq!(id, "files"),
        other => panic!("expected MissingControl, got {:?}", other),
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_trigger_pick_wrong_control_id() {
    let store = Arc::new(MemoryStore::new());
    let controls = PickerRegistry::new().with("file-input", Arc::new(PathPicker::default()));
    let importer = FileImporter::new(store, StorageKeys::default()).with_controls(controls);

    assert!(matches!(
        importer.trigger_pick().await,
        Err(ImportError::MissingControl(_))
    ));
}

#[tokio::test]
async fn test_trigger_pick_imports_selection() {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("a.txt");
    let b = temp_dir.path().join("b.txt");
    fs::write(&a, "first").unwrap();
    fs::write(&b, "second").unwrap();

    let store = Arc::new(MemoryStore::new());
    let controls = PickerRegistry::new().with("files", Arc::new(PathPicker::new([a, b])));
    let importer = FileImporter::new(store, StorageKeys::default()).with_controls(controls);
    importer.initialize().await.unwrap();

    let summary = importer.trigger_pick().await.unwrap();

    assert_eq!(summary.imported(), 2);
    let state = importer.state().await.unwrap();
    assert_eq!(state.count, 2);
    // Completion order is not fixed, so either file may have been stored last
    let content = state.content.unwrap();
    assert!(content == "first" || content == "second");
}

#[tokio::test]
async fn test_trigger_pick_empty_selection() {
    let store = Arc::new(MemoryStore::new());
    let controls = PickerRegistry::new().with("files", Arc::new(PathPicker::default()));
    let importer = FileImporter::new(store, StorageKeys::default()).with_controls(controls);
    importer.initialize().await.unwrap();

    let summary = importer.trigger_pick().await.unwrap();

    assert!(summary.is_empty());
    assert_eq!(importer.state().await.unwrap().count, 0);
}
