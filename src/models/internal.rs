use serde::Serialize;
use std::path::PathBuf;

use crate::services::file_importer::ImportError;

/// Where the bytes of a [`SelectedFile`] come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file chosen through a picker. Only lives until it has been read.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub size: Option<u64>,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            size: None,
            source: FileSource::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: Some(bytes.len() as u64),
            source: FileSource::Bytes(bytes),
        }
    }
}

/// Snapshot of what the importer has persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadState {
    pub content: Option<String>,
    pub count: u64,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub name: String,
    pub result: Result<ImportedFile, ImportError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedFile {
    pub bytes: usize,
    /// Hex SHA-256 of the stored text
    pub sha256: String,
    /// Counter value written by this import
    pub count: u64,
}

/// Result of one selection, outcomes in read-completion order.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl ImportSummary {
    pub fn imported(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.imported()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &ImportError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }
}
