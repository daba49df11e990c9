//! Project lifecycle on top of [`LabelSerializer`].
//!
//! [`ProjectManager`] is the single owner of the live model. Collaborators
//! receive it (or a clone of [`ProjectManager::labels`]) explicitly.

use std::path::{Path, PathBuf};

use crate::config::{ConfigError, SettingsStore};
use crate::format::{LabelSerializer, PersistError};
use crate::model::Labels;
use crate::storage::{FileStore, NativeFileStore};

/// Opens, creates and saves projects, remembering the current project path
/// in a [`SettingsStore`].
#[derive(Debug)]
pub struct ProjectManager<S: SettingsStore, F: FileStore = NativeFileStore> {
    settings: S,
    serializer: LabelSerializer<F>,
}

impl<S: SettingsStore, F: FileStore> ProjectManager<S, F> {
    pub fn new(settings: S, serializer: LabelSerializer<F>) -> Self {
        Self {
            settings,
            serializer,
        }
    }

    pub fn labels(&self) -> &Labels {
        self.serializer.labels()
    }

    pub fn serializer(&self) -> &LabelSerializer<F> {
        &self.serializer
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Path of the current project, or the default location when none was
    /// chosen yet.
    pub fn project_path(&self) -> PathBuf {
        self.settings
            .last_project_path()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.serializer.default_project_path().to_path_buf())
    }

    /// Load the remembered project, falling back to an empty default project.
    /// Returns whether the remembered project was loaded.
    pub fn load_last_project(&self) -> bool {
        let loaded = match self.settings.last_project_path() {
            Some(path) => self.serializer.load(&path).is_ok(),
            None => {
                log::info!("No previous project recorded");
                false
            }
        };
        if !loaded {
            self.serializer.load_defaults();
        }
        loaded
    }

    /// Start a new empty project at the default location.
    pub fn create_project(&self) -> Result<(), ConfigError> {
        let path = self.serializer.default_project_path().display().to_string();
        self.settings.set_last_project_path(&path)?;
        self.serializer.load_defaults();
        Ok(())
    }

    /// Remember `path` as the current project and load it.
    pub fn open_project(&self, path: impl AsRef<Path>) -> Result<(), ManagerError> {
        let path = path.as_ref();
        self.settings
            .set_last_project_path(&path.display().to_string())?;
        self.reload_project()
    }

    /// Load the current project again, discarding unsaved changes.
    pub fn reload_project(&self) -> Result<(), ManagerError> {
        Ok(self.serializer.load(self.project_path())?)
    }

    /// Save to the current project path.
    pub fn save_project(&self) -> Result<(), ManagerError> {
        Ok(self.serializer.save(self.project_path())?)
    }

    /// Save to `path` and make it the current project once that succeeded.
    pub fn save_project_as(&self, path: impl AsRef<Path>) -> Result<(), ManagerError> {
        let path = path.as_ref();
        self.serializer.save(path)?;
        self.settings
            .set_last_project_path(&path.display().to_string())?;
        Ok(())
    }

    pub fn add_images<I, P>(&self, image_paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.labels().add_images(image_paths);
    }

    pub fn remove_selected_images(&self) {
        self.labels().remove_selected_images();
    }
}

/// Errors from project lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Failed to update settings: {0}")]
    Settings(#[from] ConfigError),
}
