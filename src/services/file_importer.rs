use futures::stream::{FuturesUnordered, StreamExt};
use sha2::{Digest, Sha256};
use std::string::FromUtf8Error;
use std::sync::Arc;

use crate::config::Config;
use crate::models::internal::{
    FileOutcome, FileSource, ImportSummary, ImportedFile, LoadState, SelectedFile,
};
use crate::services::file_picker::PickerRegistry;
use crate::storage::kv::{parse_counter, KeyValueStore, StorageError};

pub const DEFAULT_CONTROL_ID: &str = "files";
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Picker control not found: {0}")]
    MissingControl(String),
    #[error("Picker failed: {0}")]
    Picker(String),
    #[error("Failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{name} is not valid UTF-8 text: {source}")]
    Decode {
        name: String,
        #[source]
        source: FromUtf8Error,
    },
    #[error("{name} is {size} bytes, limit is {limit}")]
    TooLarge { name: String, size: u64, limit: u64 },
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Names of the two storage slots the importer writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub content: String,
    pub counter: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            content: "loaded_anim".to_string(),
            counter: "loaded_count".to_string(),
        }
    }
}

impl From<&Config> for StorageKeys {
    fn from(cfg: &Config) -> Self {
        Self {
            content: cfg.content_key.clone(),
            counter: cfg.counter_key.clone(),
        }
    }
}

/// Reads picked files as text and stores the last one plus a load counter.
pub struct FileImporter {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    controls: PickerRegistry,
    control_id: String,
    max_file_size: u64,
    reset_on_start: bool,
}

impl FileImporter {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self {
            store,
            keys,
            controls: PickerRegistry::new(),
            control_id: DEFAULT_CONTROL_ID.to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            reset_on_start: true,
        }
    }

    pub fn from_config(store: Arc<dyn KeyValueStore>, cfg: &Config) -> Self {
        Self::new(store, StorageKeys::from(cfg))
            .with_control_id(cfg.control_id.clone())
            .with_max_file_size(cfg.max_file_size)
            .with_reset_on_start(cfg.reset_counter_on_start)
    }

    pub fn with_controls(mut self, controls: PickerRegistry) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_control_id(mut self, id: impl Into<String>) -> Self {
        self.control_id = id.into();
        self
    }

    pub fn with_max_file_size(mut self, limit: u64) -> Self {
        self.max_file_size = limit;
        self
    }

    pub fn with_reset_on_start(mut self, reset: bool) -> Self {
        self.reset_on_start = reset;
        self
    }

    /// Start-up hook: zeroes the counter unless reset-on-start is disabled.
    pub async fn initialize(&self) -> Result<(), ImportError> {
        if self.reset_on_start {
            self.reset().await?;
        } else {
            tracing::debug!("Keeping existing counter {}", self.keys.counter);
        }
        Ok(())
    }

    /// Asks the configured picker control for a selection and imports it.
    pub async fn trigger_pick(&self) -> Result<ImportSummary, ImportError> {
        let picker = self
            .controls
            .get(&self.control_id)
            .ok_or_else(|| ImportError::MissingControl(self.control_id.clone()))?;

        let files = picker.pick().await?;
        if files.is_empty() {
            tracing::info!("Empty selection from control {}", self.control_id);
        }
        Ok(self.on_selection_changed(files).await)
    }

    /// Reads every file concurrently and stores each one as its read completes.
    ///
    /// Outcomes are listed in completion order. A failed file never touches
    /// storage and does not stop the others.
    pub async fn on_selection_changed(&self, files: Vec<SelectedFile>) -> ImportSummary {
        let mut pending: FuturesUnordered<_> = files
            .into_iter()
            .map(|file| async move {
                let result = self.import_one(&file).await;
                FileOutcome {
                    name: file.name,
                    result,
                }
            })
            .collect();

        let mut summary = ImportSummary::default();
        while let Some(outcome) = pending.next().await {
            match &outcome.result {
                Ok(imported) => tracing::info!(
                    "Imported {} ({} bytes, sha256 {}), count now {}",
                    outcome.name,
                    imported.bytes,
                    imported.sha256,
                    imported.count
                ),
                Err(e) => tracing::warn!("Import of {} failed: {}", outcome.name, e),
            }
            summary.outcomes.push(outcome);
        }
        summary
    }

    /// Stores `content` as the last loaded animation and bumps the counter.
    /// Returns the new counter value.
    ///
    /// Content is written before the counter and nothing is rolled back: if
    /// the increment fails, the new content stays stored with the old count.
    pub async fn on_file_read(&self, content: &str) -> Result<u64, ImportError> {
        self.store.set(&self.keys.content, content).await?;
        let count = self.store.increment(&self.keys.counter).await?;
        Ok(count)
    }

    pub async fn state(&self) -> Result<LoadState, ImportError> {
        let content = self.store.get(&self.keys.content).await?;
        let raw_count = self.store.get(&self.keys.counter).await?;
        Ok(LoadState {
            content,
            count: parse_counter(&self.keys.counter, raw_count.as_deref()),
        })
    }

    /// Sets the counter back to 0. Stored content is left alone.
    pub async fn reset(&self) -> Result<(), ImportError> {
        self.store.set(&self.keys.counter, "0").await?;
        tracing::debug!("Counter {} reset to 0", self.keys.counter);
        Ok(())
    }

    async fn import_one(&self, file: &SelectedFile) -> Result<ImportedFile, ImportError> {
        let text = read_text(file, self.max_file_size).await?;
        let count = self.on_file_read(&text).await?;
        Ok(ImportedFile {
            bytes: text.len(),
            sha256: hex::encode(Sha256::digest(text.as_bytes())),
            count,
        })
    }
}

/// Reads the whole file and decodes it as UTF-8, byte for byte.
pub async fn read_text(file: &SelectedFile, limit: u64) -> Result<String, ImportError> {
    // A size reported by the picker lets oversized files fail without touching disk
    if let Some(size) = file.size {
        check_size(&file.name, size, limit)?;
    }

    let bytes = match &file.source {
        FileSource::Path(path) => {
            let read_err = |source| ImportError::Read {
                name: file.name.clone(),
                source,
            };
            let metadata = tokio::fs::metadata(path).await.map_err(read_err)?;
            if !metadata.is_file() {
                return Err(read_err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a regular file",
                )));
            }
            check_size(&file.name, metadata.len(), limit)?;
            tokio::fs::read(path).await.map_err(read_err)?
        }
        FileSource::Bytes(bytes) => {
            check_size(&file.name, bytes.len() as u64, limit)?;
            bytes.clone()
        }
    };

    String::from_utf8(bytes).map_err(|source| ImportError::Decode {
        name: file.name.clone(),
        source,
    })
}

fn check_size(name: &str, size: u64, limit: u64) -> Result<(), ImportError> {
    if size > limit {
        return Err(ImportError::TooLarge {
            name: name.to_string(),
            size,
            limit,
        });
    }
    Ok(())
}
