//! anim-loader - animation file importer backed by durable key/value storage

pub mod config;
pub mod models;
pub mod services;
pub mod storage;

// Re-export main types for convenience
pub use crate::config::Config;
pub use crate::models::internal::{FileOutcome, ImportSummary, LoadState, SelectedFile};
pub use crate::services::file_importer::{FileImporter, ImportError, StorageKeys};
pub use crate::services::file_picker::{FilePicker, PickerRegistry};
pub use crate::storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError};
