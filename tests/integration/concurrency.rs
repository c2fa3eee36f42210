// tests/integration/concurrency.rs
use super::{create_memory_sqlite, create_test_importer, sqlite_url, Arc};
use anim_loader::{KeyValueStore, MemoryStore, SelectedFile, SqliteStore};
use std::fs;
use tempfile::TempDir;

fn two_files(dir: &TempDir) -> Vec<SelectedFile> {
    let a = dir.path().join("run.json");
    let b = dir.path().join("jump.json");
    fs::write(&a, "run").unwrap();
    // Larger file so the two reads are unlikely to finish together
    fs::write(&b, "jump".repeat(10_000)).unwrap();
    vec![SelectedFile::from_path(a), SelectedFile::from_path(b)]
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_files_count_exactly_two_memory() {
    let temp_dir = TempDir::new().unwrap();
    let importer = create_test_importer(Arc::new(MemoryStore::new())).await;

    let summary = importer.on_selection_changed(two_files(&temp_dir)).await;

    assert_eq!(summary.imported(), 2);
    assert_eq!(importer.state().await.unwrap().count, 2);
}

#[tokio::test]
async fn test_two_files_count_exactly_two_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let importer = create_test_importer(create_memory_sqlite().await).await;

    let summary = importer.on_selection_changed(two_files(&temp_dir)).await;

    assert_eq!(summary.imported(), 2);
    let state = importer.state().await.unwrap();
    assert_eq!(state.count, 2);

    // Last write wins; either file may have been stored last
    let content = state.content.unwrap();
    assert!(content == "run" || content == "jump".repeat(10_000));
}

#[tokio::test]
async fn test_concurrent_increments_sqlite_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteStore::connect(&sqlite_url(&temp_dir)).await.unwrap());

    let mut handles = vec![];
    for _ in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(async move { store.increment("loaded_count").await }));
    }

    let mut seen = vec![];
    for handle in handles {
        seen.push(handle.await.unwrap().unwrap());
    }
    seen.sort();

    // Every caller saw a distinct value: no lost updates
    assert_eq!(seen, (1..=20).collect::<Vec<u64>>());
    assert_eq!(
        store.get("loaded_count").await.unwrap().as_deref(),
        Some("20")
    );
}

#[tokio::test]
async fn test_many_files_one_selection() {
    let importer = create_test_importer(create_memory_sqlite().await).await;

    let files = (0..25)
        .map(|i| SelectedFile::from_bytes(format!("pose_{}.json", i), format!("pose {}", i)))
        .collect();
    let summary = importer.on_selection_changed(files).await;

    assert_eq!(summary.imported(), 25);
    assert_eq!(importer.state().await.unwrap().count, 25);

    let mut counts: Vec<u64> = summary
        .outcomes
        .iter()
        .map(|o| o.result.as_ref().unwrap().count)
        .collect();
    // Each completion bumped the counter exactly once
    counts.sort();
    assert_eq!(counts, (1..=25).collect::<Vec<u64>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_selections_share_memory_counter() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let importer = Arc::new(create_test_importer(store.clone()).await);

    let mut handles = vec![];
    for i in 0..300 {
        let importer = importer.clone();
        handles.push(tokio::spawn(async move {
            let file = SelectedFile::from_bytes(format!("clip_{}.json", i), format!("clip {}", i));
            importer.on_selection_changed(vec![file]).await.imported()
        }));
    }

    let mut imported = 0;
    for handle in handles {
        imported += handle.await.unwrap();
    }

    assert_eq!(imported, 300);
    assert_eq!(importer.state().await.unwrap().count, 300);
    assert_eq!(
        store.get("loaded_count").await.unwrap().as_deref(),
        Some("300")
    );
}
