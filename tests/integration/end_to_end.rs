// tests/integration/end_to_end.rs
//! Picker → importer → SQLite, the way the command-line front end wires it

use super::{sqlite_url, Arc};
use anim_loader::{
    services::{DirectoryPicker, PathPicker},
    Config, FileImporter, KeyValueStore, PickerRegistry, SqliteStore,
};
use std::fs;
use tempfile::TempDir;

fn test_config(dir: &TempDir) -> Config {
    Config {
        database_url: sqlite_url(dir),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_directory_import_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let anims = temp_dir.path().join("anims");
    fs::create_dir(&anims).unwrap();
    for i in 0..3 {
        fs::write(anims.join(format!("animation_{}.json", i)), format!("{{\"slot\":{}}}", i))
            .unwrap();
    }

    let config = test_config(&temp_dir);
    let store = Arc::new(SqliteStore::connect(&config.database_url).await.unwrap());
    let controls =
        PickerRegistry::new().with(config.control_id.clone(), Arc::new(DirectoryPicker::new(&anims)));
    let importer = FileImporter::from_config(store, &config).with_controls(controls);
    importer.initialize().await.unwrap();

    let summary = importer.trigger_pick().await.unwrap();

    assert_eq!(summary.imported(), 3);
    assert_eq!(importer.state().await.unwrap().count, 3);
}

#[tokio::test]
async fn test_config_keys_and_limit_apply() {
    let temp_dir = TempDir::new().unwrap();
    let small = temp_dir.path().join("small.json");
    let big = temp_dir.path().join("big.json");
    fs::write(&small, "ok").unwrap();
    fs::write(&big, "x".repeat(100)).unwrap();

    let config = Config {
        counter_key: "load_count".to_string(),
        max_file_size: 10,
        ..test_config(&temp_dir)
    };
    let store = Arc::new(SqliteStore::connect(&config.database_url).await.unwrap());
    let controls = PickerRegistry::new().with("files", Arc::new(PathPicker::new([small, big])));
    let importer = FileImporter::from_config(store.clone(), &config).with_controls(controls);
    importer.initialize().await.unwrap();

    let summary = importer.trigger_pick().await.unwrap();

    assert_eq!(summary.imported(), 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(store.get("load_count").await.unwrap().as_deref(), Some("1"));
    assert_eq!(store.get("loaded_count").await.unwrap(), None);
}
