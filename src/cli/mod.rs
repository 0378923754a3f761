//! CLI module for shardplan
//!
//! Provides command-line interface for:
//! - plan: Plan organization sets over a catalog file
//! - tables: List catalog tables and their partitioning

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{plan, run_command, tables};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_catalog, write_json};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}
