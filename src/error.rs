use crate::cell::CellKind;
use thiserror::Error;

/// Errors that can occur when using a `TypedMap`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// A strict add was attempted on a key that is already present
    #[error("Key already exists: {0}")]
    DuplicateKey(String),
    /// The requested key was not found
    #[error("Key not found: {0}")]
    KeyNotFound(String),
    /// The key holds a cell of a different variant than the one requested
    #[error("Wrong variant for key {key}: expected {expected}, found {actual}")]
    WrongVariant {
        key: String,
        expected: CellKind,
        actual: CellKind,
    },
    /// Failed to acquire the lock of a `SharedTypedMap`
    #[error("Failed to acquire lock")]
    LockError,
}

impl MapError {
    /// The `Debug`-formatted key this error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            MapError::DuplicateKey(key) | MapError::KeyNotFound(key) => Some(key),
            MapError::WrongVariant { key, .. } => Some(key),
            MapError::LockError => None,
        }
    }
}
