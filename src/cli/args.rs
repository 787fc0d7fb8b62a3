//! Command-line argument definitions for the delimiter checker
//!
//! Defines the CLI interface using the clap derive API. Both subcommands share
//! the per-file check options and the logging flags.

use crate::config::{CheckerConfig, ScanConfig, parse_delimiter};
use crate::constants::{DEFAULT_FILE_SUFFIX, DEFAULT_LOG_LEVEL, default_parallel_workers};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the delimiter checker
///
/// Verifies that every record of a delimited text file has the same number of
/// delimiters as its header record.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "delimiter-checker",
    version,
    about = "Check that every record of a delimited file matches its header's delimiter count",
    long_about = "Reads a delimited text file (CSV, TSV, pipe-separated, ...) with quote-aware \
                  parsing and compares the delimiter count of every record against the header. \
                  Files are classified GOOD, FAIR (only tolerated over-count records) or BAD, \
                  and an optional .ERROR_DELIMITER report lists the offending records."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Check a single delimited file
    Check(CheckArgs),
    /// Check every matching file in a directory
    Scan(ScanArgs),
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// Field delimiter (single character; `\t` or `tab` for TAB)
    #[arg(value_name = "DELIMITER")]
    pub delimiter: String,

    /// File to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub options: CheckOptions,

    #[command(flatten)]
    pub logging: LoggingOptions,

    /// Output format for the final result
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the result"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the scan command (directory mode)
#[derive(Debug, Clone, Parser)]
pub struct ScanArgs {
    /// Field delimiter (single character; `\t` or `tab` for TAB)
    #[arg(value_name = "DELIMITER")]
    pub delimiter: String,

    /// Directory to scan
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    #[command(flatten)]
    pub options: CheckOptions,

    /// Only check files whose name ends with this suffix
    #[arg(
        long = "suffix",
        value_name = "SUFFIX",
        default_value = DEFAULT_FILE_SUFFIX,
        help = "File name suffix to select files"
    )]
    pub suffix: String,

    /// Descend into subdirectories
    #[arg(short = 'R', long = "recursive", help = "Scan subdirectories too")]
    pub recursive: bool,

    /// Number of files checked concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        default_value_t = default_parallel_workers(),
        help = "Number of files checked concurrently"
    )]
    pub workers: usize,

    #[command(flatten)]
    pub logging: LoggingOptions,
}

/// Options applied to every validation run
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckOptions {
    /// Write a `.ERROR_DELIMITER` report next to files that are not GOOD
    #[arg(
        short = 'w',
        long = "write-output-file",
        help = "Write a .ERROR_DELIMITER report for files with bad records"
    )]
    pub write_output_file: bool,

    /// Tolerate records with too many delimiters when none has too few
    #[arg(
        short = 'i',
        long = "ignore-over-count",
        help = "Report FAIR instead of BAD when only over-count records exist"
    )]
    pub ignore_over_count: bool,

    /// Expected delimiter count; zero or negative derives it from the header
    #[arg(
        short = 'd',
        long = "delimiter-count",
        value_name = "N",
        allow_negative_numbers = true,
        help = "Expected delimiter count (default: header's count)"
    )]
    pub delimiter_count: Option<i64>,

    /// Batch identifier prefixed to every log line
    #[arg(
        short = 'b',
        long = "batch-id",
        value_name = "ID",
        help = "Batch identifier for log lines"
    )]
    pub batch_id: Option<String>,

    /// Rewrite GOOD/FAIR files with this delimiter
    #[arg(
        short = 'r',
        long = "replacement-delimiter",
        value_name = "C",
        help = "Rewrite validated files to <file>.redelimited with this delimiter"
    )]
    pub replacement_delimiter: Option<String>,
}

/// Verbosity flags shared by every subcommand
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LoggingOptions {
    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Output format options for the final result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Result<Commands> {
        self.command
            .clone()
            .ok_or_else(|| Error::configuration("No command given"))
    }
}

impl CheckOptions {
    /// Build the per-file configuration for `delimiter`
    pub fn to_config(&self, delimiter: &str) -> Result<CheckerConfig> {
        let mut config = CheckerConfig::new(parse_delimiter(delimiter)?);

        if let Some(count) = self.delimiter_count {
            config = config.with_expected_delimiter_count(count);
        }
        if self.ignore_over_count {
            config = config.with_ignore_over_count();
        }
        if self.write_output_file {
            config = config.with_output_file();
        }
        if let Some(batch_id) = &self.batch_id {
            config = config.with_batch_id(batch_id.as_str());
        }
        if let Some(replacement) = &self.replacement_delimiter {
            config = config.with_replacement_delimiter(parse_delimiter(replacement)?);
        }

        config.validate()?;
        Ok(config)
    }
}

impl LoggingOptions {
    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => DEFAULT_LOG_LEVEL,
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl CheckArgs {
    pub fn to_config(&self) -> Result<CheckerConfig> {
        self.options.to_config(&self.delimiter)
    }
}

impl ScanArgs {
    pub fn to_config(&self) -> Result<ScanConfig> {
        let checker = self.options.to_config(&self.delimiter)?;
        let mut config = ScanConfig::new(&self.directory, checker)
            .with_suffix(self.suffix.as_str())
            .with_workers(self.workers);
        if self.recursive {
            config = config.with_recursive();
        }

        config.validate()?;
        Ok(config)
    }
}
