//! Error types for storage operations.

use crate::id::FragmentPath;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A shard directory could not be created.
    #[error("could not create '{}': {source}", path.display())]
    CreateDir {
        /// The directory being created.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// A fragment record could not be written.
    #[error("failed to write fragment '{}': {source}", path.display())]
    Write {
        /// The record being written.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// A fragment record could not be read.
    #[error("failed to read file '{}': {source}", path.display())]
    Read {
        /// The record being read.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// A directory in the hierarchy could not be listed.
    #[error("failed to read dir '{}': {source}", path.display())]
    ListDir {
        /// The directory being listed.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// A fragment record could not be removed.
    #[error("failed to remove '{}': {source}", path.display())]
    Delete {
        /// The path being removed.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// No record exists at the given path.
    #[error("no fragment at '{0}'")]
    NotFound(FragmentPath),
}
