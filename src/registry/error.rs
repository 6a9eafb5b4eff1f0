use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Errors surfaced by [`Registry`](super::Registry) operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("config name cannot be empty")]
    EmptyName,

    #[error("config with name '{0}' already exists")]
    DuplicateName(String),

    #[error("config not found: {0}")]
    NotFound(String),

    #[error("failed to parse config metadata {}", .path.display())]
    CorruptMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Content offered to `add` failed validation
    #[error("invalid configuration content")]
    InvalidContent(#[from] ValidationError),

    /// A stored record no longer validates
    #[error("configuration '{name}' ({id}) is invalid")]
    InvalidRecord {
        name: String,
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("failed to serialize config metadata")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to apply configuration to {}{}", .target.display(), restore_note(.restore_error))]
    ApplyFailed {
        target: PathBuf,
        #[source]
        source: StorageError,
        restore_error: Option<StorageError>,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RegistryError {
    /// The validator's verdict, if this error came from the JSON gate
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            RegistryError::InvalidContent(err) | RegistryError::InvalidRecord { source: err, .. } => {
                Some(err)
            }
            _ => None,
        }
    }
}

fn restore_note(restore_error: &Option<StorageError>) -> String {
    match restore_error {
        Some(err) => format!(" (restoring the backup also failed: {err})"),
        None => String::new(),
    }
}
