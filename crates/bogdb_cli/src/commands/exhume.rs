//! Exhume command implementation.

use super::CommandError;
use bogdb_core::{format_timestamp, Bog};
use std::io::Write;
use tracing::info;

/// Exhumes one fragment and writes its contents, then a newline, to
/// `output`. An empty bog writes nothing.
pub fn run(bog: &mut Bog, output: &mut impl Write) -> Result<(), CommandError> {
    let Some(fragment) = bog.exhume().map_err(CommandError::Exhume)? else {
        info!("the bog is empty");
        return Ok(());
    };

    info!(
        interred_at = %format_timestamp(fragment.interred_at),
        bytes = fragment.contents.len(),
        "exhumed"
    );
    output
        .write_all(&fragment.contents)
        .map_err(CommandError::Stdout)?;
    output.write_all(b"\n").map_err(CommandError::Stdout)?;
    output.flush().map_err(CommandError::Stdout)
}
