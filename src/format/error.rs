//! Error types for label file and dataset format operations.

use thiserror::Error;

use crate::model::StoreError;

/// Errors that can occur while reading, writing or converting label data.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Label file references boxes that do not exist
    #[error("Invalid annotation data: {0}")]
    Store(#[from] StoreError),

    /// Tag or interaction name missing from a category map
    #[error("Unknown {kind} category '{name}'")]
    UnknownCategory {
        /// Which map was searched ("object" or "interaction")
        kind: String,
        /// The name that was not found
        name: String,
    },

    /// Invalid format structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create an unknown category error.
    pub fn unknown_category(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownCategory {
            kind: kind.into(),
            name: name.into(),
        }
    }
}
