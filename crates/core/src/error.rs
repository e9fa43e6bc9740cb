use thiserror::Error;

use crate::store::StoreError;

/// Error type for inspection operations.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The target file does not exist. Checked before any other work.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Reading from the byte store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Writing to an output sink failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// XOR transform was given an empty key.
    #[error("XOR key must not be empty")]
    InvalidKey,
}

impl InspectError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, InspectError::NotFound(_))
    }
}

/// Convenience result type for inspection operations.
pub type InspectResult<T> = Result<T, InspectError>;
