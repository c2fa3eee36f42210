//! File-picker controls.
//!
//! A picker produces a selection of [`SelectedFile`]s. Pickers are looked up
//! by id in a [`PickerRegistry`], the same way a page looks up its file
//! input by element id.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::models::internal::SelectedFile;
use crate::services::file_importer::ImportError;

#[async_trait]
pub trait FilePicker: Send + Sync {
    /// Returns the user's selection. A cancelled pick is an empty selection.
    async fn pick(&self) -> Result<Vec<SelectedFile>, ImportError>;
}

/// Selects a fixed list of paths, e.g. from the command line.
///
/// Paths are not checked here; an unreadable path fails when it is read.
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    paths: Vec<PathBuf>,
}

impl PathPicker {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl FilePicker for PathPicker {
    async fn pick(&self) -> Result<Vec<SelectedFile>, ImportError> {
        Ok(self.paths.iter().cloned().map(SelectedFile::from_path).collect())
    }
}

/// Selects every regular file directly inside a directory, sorted by name.
#[derive(Debug, Clone)]
pub struct DirectoryPicker {
    dir: PathBuf,
}

impl DirectoryPicker {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FilePicker for DirectoryPicker {
    async fn pick(&self) -> Result<Vec<SelectedFile>, ImportError> {
        let dir_name = self.dir.display().to_string();
        let read_err = |source| ImportError::Read {
            name: dir_name.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(read_err)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
            let metadata = entry.metadata().await.map_err(read_err)?;
            if metadata.is_file() {
                let mut file = SelectedFile::from_path(entry.path());
                file.size = Some(metadata.len());
                files.push(file);
            }
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!("Picked {} files from {}", files.len(), dir_name);
        Ok(files)
    }
}

/// Native multi-file dialog.
#[cfg(feature = "dialog")]
#[derive(Debug, Clone)]
pub struct DialogPicker {
    title: String,
    extensions: Vec<String>,
}

#[cfg(feature = "dialog")]
impl DialogPicker {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extensions: Vec::new(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(feature = "dialog")]
#[async_trait]
impl FilePicker for DialogPicker {
    async fn pick(&self) -> Result<Vec<SelectedFile>, ImportError> {
        let mut dialog = rfd::AsyncFileDialog::new().set_title(self.title.as_str());
        if !self.extensions.is_empty() {
            dialog = dialog.add_filter("Animation", &self.extensions);
        }

        match dialog.pick_files().await {
            Some(handles) => Ok(handles
                .into_iter()
                .map(|h| SelectedFile::from_path(h.path().to_path_buf()))
                .collect()),
            None => {
                tracing::info!("File dialog cancelled");
                Ok(Vec::new())
            }
        }
    }
}

/// Picker controls by id.
#[derive(Clone, Default)]
pub struct PickerRegistry {
    controls: HashMap<String, Arc<dyn FilePicker>>,
}

impl PickerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, picker: Arc<dyn FilePicker>) -> &mut Self {
        self.controls.insert(id.into(), picker);
        self
    }

    pub fn with(mut self, id: impl Into<String>, picker: Arc<dyn FilePicker>) -> Self {
        self.register(id, picker);
        self
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn FilePicker>> {
        self.controls.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.controls.contains_key(id)
    }
}

impl std::fmt::Debug for PickerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.controls.keys().collect();
        ids.sort();
        f.debug_struct("PickerRegistry").field("controls", &ids).finish()
    }
}
