//! BogDB CLI
//!
//! Command-line shell for a BogDB bog.
//!
//! # Commands
//!
//! - `inter` - Read stdin and bury it as fragments
//! - `exhume` - Dig up one fragment and print it
//!
//! Setup failures exit with status 1, command failures with status 2.

mod commands;

use bogdb_core::{Bog, Config, DEFAULT_ROOT};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// BogDB: a store that forgets.
#[derive(Parser)]
#[command(name = "bogdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the bog
    #[arg(global = true, short, long, default_value = DEFAULT_ROOT)]
    path: PathBuf,

    /// Seed for the random source (defaults to OS entropy)
    #[arg(global = true, long)]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Break stdin into fragments and bury them
    Inter,

    /// Dig up one fragment and print it to stdout
    Exhume,
}

const SETUP_FAILURE: u8 = 1;
const COMMAND_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(SETUP_FAILURE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Logs go to stderr; stdout carries only exhumed bytes.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut config = Config::new().root(cli.path);
    if let Some(seed) = cli.seed {
        config = config.seed(seed);
    }

    let mut bog = match Bog::open(config) {
        Ok(bog) => bog,
        Err(err) => {
            eprintln!("failed to open the bog: {err}");
            return ExitCode::from(SETUP_FAILURE);
        }
    };

    let result = match cli.command {
        Commands::Inter => commands::inter::run(&mut bog, &mut io::stdin().lock()),
        Commands::Exhume => commands::exhume::run(&mut bog, &mut io::stdout().lock()),
    };

    if cli.verbose {
        match bog.fragment_count() {
            Ok(fragments) => debug!(fragments, "fragments remaining"),
            Err(err) => debug!(error = %err, "could not count fragments"),
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(COMMAND_FAILURE)
        }
    }
}
