//! Command implementations for the delimiter checker CLI
//!
//! Each subcommand lives in its own module and returns the process exit code
//! on success; errors carry their own code via [`crate::Error::exit_code`].

pub mod check;
pub mod scan;
pub mod shared;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Dispatch to the subcommand handler
pub async fn run(args: Args) -> Result<i32> {
    match args.get_command()? {
        Commands::Check(check_args) => check::run_check(check_args).await,
        Commands::Scan(scan_args) => scan::run_scan(scan_args).await,
    }
}
