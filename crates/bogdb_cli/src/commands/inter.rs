//! Inter command implementation.

use super::CommandError;
use bogdb_core::Bog;
use std::io::Read;
use tracing::info;

/// Reads all of `input` and inters it. Empty input buries nothing.
pub fn run(bog: &mut Bog, input: &mut impl Read) -> Result<(), CommandError> {
    let mut data = Vec::new();
    input.read_to_end(&mut data).map_err(CommandError::Stdin)?;

    if data.is_empty() {
        info!("stdin was empty, nothing interred");
        return Ok(());
    }

    bog.inter(&data).map_err(CommandError::Inter)?;
    info!(bytes = data.len(), "interred");
    Ok(())
}
