//! CLI argument definitions using clap
//!
//! Commands:
//! - tableindex build --config <path> --rows <path>
//! - tableindex query --config <path> --rows <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tableindex - In-memory secondary indexes over tabular rows
#[derive(Parser, Debug)]
#[command(name = "tableindex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build an index over a rows file and print a summary
    Build {
        /// Path to configuration file
        #[arg(long, default_value = "./tableindex.json")]
        config: PathBuf,

        /// Path to rows file (JSON array or object of id -> row)
        #[arg(long)]
        rows: PathBuf,
    },

    /// Build an index, then answer one JSON query per stdin line
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./tableindex.json")]
        config: PathBuf,

        /// Path to rows file (JSON array or object of id -> row)
        #[arg(long)]
        rows: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
