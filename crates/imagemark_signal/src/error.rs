//! Contract violations reported by the observable containers.

use thiserror::Error;

/// Errors returned by [`SignalList`](crate::SignalList) and
/// [`SignalDictionary`](crate::SignalDictionary).
///
/// These indicate a caller bug. The offending call has no effect on the
/// container and emits no notification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// Index outside `0..len` (or `0..=len` for insertion)
    #[error("Index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Range `index..index + count` does not fit inside the list
    #[error("Range starting at {index} with count {count} is out of bounds for length {len}")]
    RangeOutOfBounds {
        index: usize,
        count: usize,
        len: usize,
    },

    /// `add` was called with a key that is already present
    #[error("An entry with key {key} already exists")]
    DuplicateKey { key: String },

    /// Strict lookup of a key that is not present
    #[error("Key {key} was not found")]
    KeyNotFound { key: String },
}

impl SignalError {
    pub(crate) fn check_index(index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexOutOfRange { index, len })
        }
    }

    pub(crate) fn check_range(index: usize, count: usize, len: usize) -> Result<(), Self> {
        match index.checked_add(count) {
            Some(end) if end <= len => Ok(()),
            _ => Err(Self::RangeOutOfBounds { index, count, len }),
        }
    }
}
