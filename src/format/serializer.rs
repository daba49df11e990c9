//! Load/save lifecycle of a [`Labels`] document.
//!
//! Loading is two-phase. The document is first parsed into a staging model
//! and every field is moved into the live model without notifying anyone.
//! Only when that succeeded does [`Labels::notify_loaded`] re-broadcast each
//! field once, followed by [`LabelSerializer::on_data_loaded`]. A failure at
//! any point before the transfer leaves the live model untouched.

use std::path::{Path, PathBuf};

use imagemark_signal::Event;
use serde_json::{Map, Value};

use super::descriptor::LABELS_FIELDS;
use super::error::PersistError;
use crate::model::Labels;
use crate::storage::{FileStore, NativeFileStore};

/// Owns the live project model and moves it to and from disk.
pub struct LabelSerializer<F: FileStore = NativeFileStore> {
    labels: Labels,
    files: F,
    default_project_path: PathBuf,
    /// Emitted with the model after `load_defaults` or a successful `load`
    pub on_data_loaded: Event<Labels>,
}

impl LabelSerializer<NativeFileStore> {
    /// Serializer over the real file system, using the platform default
    /// project location.
    pub fn new() -> Self {
        Self::with_store(NativeFileStore, crate::config::default_project_path())
    }
}

impl Default for LabelSerializer<NativeFileStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileStore> LabelSerializer<F> {
    /// Create a serializer with default model contents. No event is emitted.
    pub fn with_store(files: F, default_project_path: impl Into<PathBuf>) -> Self {
        let serializer = Self {
            labels: Labels::new(),
            files,
            default_project_path: default_project_path.into(),
            on_data_loaded: Event::new(),
        };
        serializer
            .labels
            .directory_path
            .init_value(serializer.default_project_path.display().to_string());
        serializer
    }

    /// The live model. Cloning it yields another handle to the same fields.
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    pub fn default_project_path(&self) -> &Path {
        &self.default_project_path
    }

    /// Reset the model to an empty project rooted at the default location.
    pub fn load_defaults(&self) {
        log::info!("Loading default project");
        self.labels.clear();
        self.labels
            .directory_path
            .set(self.default_project_path.display().to_string());
        self.on_data_loaded.emit(&self.labels);
    }

    /// Replace the model with the project stored at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        self.try_load(path).inspect_err(|e| {
            log::error!("Failed to load project {:?}: {}", path, e);
        })?;
        log::info!("Loaded project from {:?}", path);
        Ok(())
    }

    fn try_load(&self, path: &Path) -> Result<(), PersistError> {
        self.check_directory(path)?;
        if !self.files.exists(path) {
            return Err(PersistError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        let text = self.files.read_all_text(path)?;
        if text.is_empty() {
            return Err(PersistError::EmptyFile {
                path: path.to_path_buf(),
            });
        }
        self.from_document(&text)
    }

    /// Write the model to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        self.try_save(path).inspect_err(|e| {
            log::error!("Failed to save project {:?}: {}", path, e);
        })?;
        log::info!("Saved project to {:?}", path);
        Ok(())
    }

    fn try_save(&self, path: &Path) -> Result<(), PersistError> {
        self.check_directory(path)?;
        let document = self.to_document()?;
        if document.is_empty() {
            return Err(PersistError::EmptyDocument {
                path: path.to_path_buf(),
            });
        }
        self.files.write_all_text(path, &document)?;
        Ok(())
    }

    fn check_directory(&self, path: &Path) -> Result<(), PersistError> {
        if path.as_os_str().is_empty() {
            return Err(PersistError::EmptyPath);
        }
        // A bare file name has no directory part and is rejected.
        let directory = path.parent().unwrap_or(Path::new(""));
        if directory.as_os_str().is_empty() || !self.files.directory_exists(directory) {
            return Err(PersistError::MissingDirectory {
                path: directory.to_path_buf(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// The model as a JSON object holding exactly the described fields.
    pub fn to_value(&self) -> Result<Value, PersistError> {
        let mut object = Map::new();
        for field in LABELS_FIELDS {
            object.insert(field.name.to_string(), (field.save)(&self.labels)?);
        }
        Ok(Value::Object(object))
    }

    /// The model as pretty-printed JSON text.
    pub fn to_document(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }

    /// Apply a JSON document to the model.
    ///
    /// Fields absent from the document keep their current value. Unknown
    /// keys are ignored.
    pub fn from_document(&self, text: &str) -> Result<(), PersistError> {
        let Value::Object(mut object) = serde_json::from_str::<Value>(text)? else {
            return Err(PersistError::invalid_document(
                "top level is not a JSON object",
            ));
        };

        let staging = Labels::new();
        for field in LABELS_FIELDS {
            (field.transfer)(&self.labels, &staging);
        }
        for field in LABELS_FIELDS {
            if let Some(value) = object.remove(field.name) {
                (field.load)(&staging, value).map_err(|e| {
                    PersistError::invalid_document(format!("field '{}': {}", field.name, e))
                })?;
            }
        }
        for key in object.keys() {
            log::warn!("Ignoring unknown project field '{}'", key);
        }

        for field in LABELS_FIELDS {
            (field.transfer)(&staging, &self.labels);
        }
        self.labels.notify_loaded();
        self.on_data_loaded.emit(&self.labels);
        Ok(())
    }
}

impl<F: FileStore + std::fmt::Debug> std::fmt::Debug for LabelSerializer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelSerializer")
            .field("labels", &self.labels)
            .field("files", &self.files)
            .field("default_project_path", &self.default_project_path)
            .finish()
    }
}
