//! Synchronous whole-file access used by the persistence engine.

use std::io;
use std::path::Path;

/// File primitives the serializer needs. Every call is blocking and reads or
/// writes a whole file.
pub trait FileStore {
    /// Whether `path` names an existing file.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` names an existing directory.
    fn directory_exists(&self, path: &Path) -> bool;

    fn read_all_text(&self, path: &Path) -> io::Result<String>;

    fn write_all_text(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// [`FileStore`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileStore;

impl FileStore for NativeFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_all_text(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_all_text(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}
