//! Application constants for the delimiter checker
//!
//! This module contains the fixed values, default settings and exit codes
//! used throughout the delimiter checker application.

// =============================================================================
// Report Artifact
// =============================================================================

/// Marker carried by every detail report written next to a checked file
pub const ERROR_DELIMITER_FILE_SUFFIX: &str = ".ERROR_DELIMITER";

/// Timestamp layout embedded in report file names (captured once per process)
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// Maximum number of bad record entries written to a detail report
pub const BAD_RECORD_REPORTING_THRESHOLD: usize = 100;

/// Suffix appended to a file rewritten with a replacement delimiter
pub const REDELIMITED_FILE_SUFFIX: &str = ".redelimited";

// =============================================================================
// Record Processing
// =============================================================================

/// Emit a progress notice after this many records
pub const PROGRESS_INTERVAL: usize = 100_000;

/// Quote character honored by the record reader
pub const QUOTE_CHAR: u8 = b'"';

/// Delimiter used when none is supplied
pub const DEFAULT_DELIMITER: char = ',';

// =============================================================================
// Directory Mode
// =============================================================================

/// File name suffix selected by directory mode when none is supplied
pub const DEFAULT_FILE_SUFFIX: &str = ".csv";

/// Upper bound on concurrent file checks in directory mode
pub const MAX_PARALLEL_WORKERS: usize = 64;

/// Default number of concurrent file checks
pub fn default_parallel_workers() -> usize {
    num_cpus::get().clamp(1, MAX_PARALLEL_WORKERS)
}

// =============================================================================
// Process Exit Contract
// =============================================================================

/// Process exit codes
///
/// Code 2 is left to clap for usage errors.
pub mod exit_codes {
    /// Outcome was GOOD or FAIR
    pub const SUCCESS: i32 = 0;

    /// Outcome was BAD (or directory mode found at least one failing file)
    pub const BAD_RECORDS: i32 = 1;

    /// Input file missing or unreadable
    pub const FILE_NOT_FOUND: i32 = 3;

    /// Input file contains undecodable text
    pub const DECODE_ERROR: i32 = 4;

    /// Any other failure (configuration, report write, interruption)
    pub const FAILURE: i32 = 5;
}

// =============================================================================
// Logging
// =============================================================================

/// Default tracing filter level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Crate name used as the tracing filter target
pub const LOG_TARGET: &str = "delimiter_checker";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parallel_workers_is_bounded() {
        let workers = default_parallel_workers();
        assert!(workers >= 1);
        assert!(workers <= MAX_PARALLEL_WORKERS);
    }

    #[test]
    fn test_report_suffix_is_dotted() {
        assert!(ERROR_DELIMITER_FILE_SUFFIX.starts_with('.'));
        assert!(!DEFAULT_FILE_SUFFIX.ends_with(ERROR_DELIMITER_FILE_SUFFIX));
    }
}
