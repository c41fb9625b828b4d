//! CLI module
//!
//! Provides command-line interface for:
//! - build: index a rows file and print a summary
//! - query: index a rows file and answer JSON line requests

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    build, execute, load_rows, open_index, query, rows_from_value, run, run_command,
    serve_requests, summary, Config, KeyList, QueryRequest,
};
pub use errors::{CliError, CliResult};
pub use io::{read_requests, write_error, write_response};
