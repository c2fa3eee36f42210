pub mod file_importer;
pub mod file_picker;

// Re-export for convenience
pub use file_importer::{FileImporter, ImportError, StorageKeys};
pub use file_picker::{DirectoryPicker, FilePicker, PathPicker, PickerRegistry};
#[cfg(feature = "dialog")]
pub use file_picker::DialogPicker;
