//! CLI argument definitions using clap
//!
//! Commands:
//! - shardplan plan --config <path> --catalog <path> [--table <id>]
//! - shardplan tables --catalog <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// shardplan - plans compaction of small shards into organization sets
#[derive(Parser, Debug)]
#[command(name = "shardplan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan organization sets and print one JSON object per set
    Plan {
        /// Path to planner configuration file
        #[arg(long, default_value = "./shardplan.json")]
        config: PathBuf,

        /// Path to catalog file (tables, columns, shards, stats)
        #[arg(long)]
        catalog: PathBuf,

        /// Plan only this table
        #[arg(long)]
        table: Option<i64>,
    },

    /// List tables in a catalog with their partitioning
    Tables {
        /// Path to catalog file
        #[arg(long)]
        catalog: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan() {
        let cli = Cli::try_parse_from([
            "shardplan",
            "plan",
            "--catalog",
            "catalog.json",
            "--table",
            "7",
        ])
        .unwrap();

        match cli.command {
            Command::Plan {
                config,
                catalog,
                table,
            } => {
                assert_eq!(config, PathBuf::from("./shardplan.json"));
                assert_eq!(catalog, PathBuf::from("catalog.json"));
                assert_eq!(table, Some(7));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_tables_requires_catalog() {
        assert!(Cli::try_parse_from(["shardplan", "tables"]).is_err());
    }
}
