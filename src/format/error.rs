//! Error types for project persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving a project document.
///
/// None of these are fatal: a failed load or save leaves the in-memory
/// project untouched.
#[derive(Error, Debug)]
pub enum PersistError {
    /// No path was given
    #[error("path is empty")]
    EmptyPath,

    /// Parent directory of the target path does not exist
    #[error("directory does not exist: {path:?}")]
    MissingDirectory {
        /// The missing directory
        path: PathBuf,
    },

    /// Project file does not exist
    #[error("file does not exist: {path:?}")]
    MissingFile {
        /// The missing file
        path: PathBuf,
    },

    /// Project file exists but has no content
    #[error("file is empty: {path:?}")]
    EmptyFile {
        /// The empty file
        path: PathBuf,
    },

    /// Serialization produced nothing to write
    #[error("serialized document is empty for {path:?}")]
    EmptyDocument {
        /// Where the document would have been written
        path: PathBuf,
    },

    /// Document parsed but does not describe a project
    #[error("invalid document: {message}")]
    InvalidDocument {
        /// Description of the problem
        message: String,
    },

    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PersistError {
    /// Create an invalid document error with a message.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}
