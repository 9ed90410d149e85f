//! Error types for BogDB core.

use crate::fragment::Fragment;
use bogdb_storage::{FragmentPath, StorageError};
use std::str::Utf8Error;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in BogDB core operations.
///
/// An empty bog is not an error: [`crate::Bog::exhume`] reports it as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The fragment store failed to list, read, write, or delete.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored record has a missing or malformed timestamp header.
    #[error("failed to parse fragment '{path}': {source}")]
    Parse {
        /// The offending record.
        path: FragmentPath,
        /// What was wrong with it.
        source: ParseError,
    },

    /// A fragment was read but its record could not be removed.
    ///
    /// The fragment is carried here, whole and uncorroded, so the caller
    /// still holds what was read.
    #[error("failed to remove fragment '{path}': {source}")]
    Unburied {
        /// The record that could not be removed.
        path: FragmentPath,
        /// The fragment as read from the record.
        fragment: Box<Fragment>,
        /// Why removal failed.
        source: StorageError,
    },

    /// The bog could not be opened with the given configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Takes back the fragment carried by an [`CoreError::Unburied`] error.
    #[must_use]
    pub fn into_fragment(self) -> Option<Fragment> {
        match self {
            Self::Unburied { fragment, .. } => Some(*fragment),
            _ => None,
        }
    }
}

/// Reasons a fragment record fails to parse.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The record has no newline ending a header line.
    #[error("missing timestamp header")]
    MissingHeader,

    /// The header line is not valid UTF-8.
    #[error("timestamp header is not UTF-8: {0}")]
    HeaderNotUtf8(#[source] Utf8Error),

    /// The header line is not an RFC3339 timestamp.
    #[error("invalid timestamp '{header}': {source}")]
    InvalidTimestamp {
        /// The header as read.
        header: String,
        /// The timestamp parser's complaint.
        source: chrono::ParseError,
    },
}
