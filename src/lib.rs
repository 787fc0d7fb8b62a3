//! Delimiter Checker Library
//!
//! A Rust library for verifying that every record in a delimited text file
//! carries the same number of fields as the file's header record.
//!
//! This library provides tools for:
//! - Reading delimited files as quoted-field-aware records
//! - Comparing each detail record's delimiter count to the header (or to an
//!   explicit expectation) and classifying mismatches
//! - Rendering GOOD / FAIR / BAD outcomes with distribution statistics
//! - Writing `.ERROR_DELIMITER` detail reports for failing files
//! - Rewriting validated files with a replacement delimiter
//! - Checking whole directories of files concurrently, one isolated run per file

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod delimiter_checker;
        pub mod directory_scanner;
        pub mod record_reader;
        pub mod report;
        pub mod rewriter;
        pub mod run_log;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CheckResult, Record, RunOutcome};
pub use app::services::delimiter_checker::DelimiterChecker;
pub use config::{CheckerConfig, ScanConfig};

use std::path::PathBuf;

/// Result type alias for the delimiter checker
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for delimiter checking operations
///
/// Field-count mismatches are not errors: they are recorded in the run's
/// bad record log and surface only through the final outcome.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Input file does not exist or cannot be opened
    #[error("File not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record content is not valid UTF-8 text
    #[error("Decode error in file '{}' at record {record}", path.display())]
    Decode { path: PathBuf, record: usize },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Delimited reader failure other than a decode error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileNotFound {
            path: path.into(),
            source,
        }
    }

    /// Create a decode error for the given 1-based record index
    pub fn decode(path: impl Into<PathBuf>, record: usize) -> Self {
        Self::Decode {
            path: path.into(),
            record,
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Process exit status for a run that ended with this error
    pub fn exit_code(&self) -> i32 {
        use crate::constants::exit_codes;

        match self {
            Self::FileNotFound { .. } => exit_codes::FILE_NOT_FOUND,
            Self::Decode { .. } => exit_codes::DECODE_ERROR,
            _ => exit_codes::FAILURE,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_distinguish_fatal_errors() {
        let missing = Error::file_not_found(
            "missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let decode = Error::decode("latin1.csv", 7);
        let config = Error::configuration("bad delimiter");

        assert_eq!(missing.exit_code(), 3);
        assert_eq!(decode.exit_code(), 4);
        assert_eq!(config.exit_code(), 5);
    }

    #[test]
    fn test_decode_error_names_record() {
        let err = Error::decode("data/latin1.csv", 12);
        assert_eq!(
            err.to_string(),
            "Decode error in file 'data/latin1.csv' at record 12"
        );
    }
}
