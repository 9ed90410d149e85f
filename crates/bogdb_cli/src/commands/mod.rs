//! CLI command implementations.

pub mod exhume;
pub mod inter;

use bogdb_core::CoreError;
use std::io;
use thiserror::Error;

/// Failures while running a command against an open bog.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Standard input could not be read.
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    /// Standard output could not be written.
    #[error("failed to write stdout: {0}")]
    Stdout(#[source] io::Error),

    /// The bog failed to inter.
    #[error("failed to inter: {0}")]
    Inter(#[source] CoreError),

    /// The bog failed to exhume.
    #[error("failed to exhume: {0}")]
    Exhume(#[source] CoreError),
}
