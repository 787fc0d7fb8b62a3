//! Configuration management and validation.
//!
//! Provides the per-file check options and the directory-mode options,
//! both built from CLI arguments and validated before any file is read.

use crate::constants::{
    DEFAULT_DELIMITER, DEFAULT_FILE_SUFFIX, MAX_PARALLEL_WORKERS, default_parallel_workers,
};
use crate::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Options for a single validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckerConfig {
    /// Field delimiter (single-byte character)
    pub delimiter: char,

    /// Explicit expected delimiter count; `None` derives it from the header
    pub expected_delimiter_count: Option<usize>,

    /// Tolerate over-count records when no under-count record exists
    pub ignore_over_count: bool,

    /// Write a `.ERROR_DELIMITER` detail report when the file is not GOOD
    pub write_output_file: bool,

    /// Batch identifier prefixed to every log line of the run
    pub batch_id: Option<String>,

    /// Rewrite a GOOD/FAIR file using this delimiter
    pub replacement_delimiter: Option<char>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            expected_delimiter_count: None,
            ignore_over_count: false,
            write_output_file: false,
            batch_id: None,
            replacement_delimiter: None,
        }
    }
}

impl CheckerConfig {
    /// Create configuration for the given delimiter with default options
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }

    /// Set the expected delimiter count (zero or negative means "use header")
    pub fn with_expected_delimiter_count(mut self, count: i64) -> Self {
        self.expected_delimiter_count = if count <= 0 {
            None
        } else {
            Some(count as usize)
        };
        self
    }

    /// Tolerate over-count records
    pub fn with_ignore_over_count(mut self) -> Self {
        self.ignore_over_count = true;
        self
    }

    /// Write a detail report when bad records are found
    pub fn with_output_file(mut self) -> Self {
        self.write_output_file = true;
        self
    }

    /// Attach a batch identifier (empty identifiers are ignored)
    pub fn with_batch_id(mut self, batch_id: impl Into<String>) -> Self {
        let batch_id = batch_id.into();
        self.batch_id = if batch_id.trim().is_empty() {
            None
        } else {
            Some(batch_id)
        };
        self
    }

    /// Rewrite validated files with a replacement delimiter
    pub fn with_replacement_delimiter(mut self, delimiter: char) -> Self {
        self.replacement_delimiter = Some(delimiter);
        self
    }

    /// Delimiter as the byte the record reader splits on
    pub fn delimiter_byte(&self) -> Result<u8> {
        single_byte(self.delimiter, "Delimiter")
    }

    /// Replacement delimiter as a byte, if configured
    pub fn replacement_byte(&self) -> Result<Option<u8>> {
        self.replacement_delimiter
            .map(|c| single_byte(c, "Replacement delimiter"))
            .transpose()
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<()> {
        let delimiter = self.delimiter_byte()?;

        if delimiter == crate::constants::QUOTE_CHAR {
            return Err(Error::configuration(
                "Delimiter cannot be the quote character '\"'",
            ));
        }

        if matches!(self.delimiter, '\n' | '\r') {
            return Err(Error::configuration(
                "Delimiter cannot be a line terminator",
            ));
        }

        if let Some(replacement) = self.replacement_byte()? {
            if replacement == crate::constants::QUOTE_CHAR {
                return Err(Error::configuration(
                    "Replacement delimiter cannot be the quote character '\"'",
                ));
            }

            if matches!(replacement, b'\n' | b'\r') {
                return Err(Error::configuration(
                    "Replacement delimiter cannot be a line terminator",
                ));
            }
        }

        debug!("Validated checker configuration: {:?}", self);
        Ok(())
    }
}

/// Parse a delimiter argument into a single character
///
/// Accepts any single character plus the aliases `\t` and `tab` for TAB.
pub fn parse_delimiter(value: &str) -> Result<char> {
    match value {
        "\\t" | "tab" | "TAB" => return Ok('\t'),
        _ => {}
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        (None, _) => Err(Error::configuration("Delimiter cannot be empty")),
        _ => Err(Error::configuration(format!(
            "Delimiter must be a single character, got '{}'",
            value
        ))),
    }
}

fn single_byte(c: char, what: &str) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(Error::configuration(format!(
            "{} must be a single-byte (ASCII) character, got '{}'",
            what, c
        )))
    }
}

/// Options for directory mode
#[derive(Debug, Clone, Serialize)]
pub struct ScanConfig {
    /// Directory to scan
    pub directory: PathBuf,

    /// Only files whose name ends with this suffix are checked
    pub suffix: String,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Maximum number of files checked concurrently
    pub workers: usize,

    /// Options applied to every file run
    pub checker: CheckerConfig,
}

impl ScanConfig {
    /// Create directory-mode configuration with default options
    pub fn new(directory: impl Into<PathBuf>, checker: CheckerConfig) -> Self {
        Self {
            directory: directory.into(),
            suffix: DEFAULT_FILE_SUFFIX.to_string(),
            recursive: false,
            workers: default_parallel_workers(),
            checker,
        }
    }

    /// Set the file name suffix filter
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Descend into subdirectories
    pub fn with_recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// Set the number of concurrent file checks
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<()> {
        if !self.directory.exists() {
            return Err(Error::configuration(format!(
                "Directory does not exist: {}",
                self.directory.display()
            )));
        }

        if !self.directory.is_dir() {
            return Err(Error::configuration(format!(
                "Path is not a directory: {}",
                self.directory.display()
            )));
        }

        if self.workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0",
            ));
        }

        if self.workers > MAX_PARALLEL_WORKERS {
            return Err(Error::configuration(format!(
                "Number of workers cannot exceed {}",
                MAX_PARALLEL_WORKERS
            )));
        }

        self.checker.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_expected_count_non_positive_means_header() {
        let config = CheckerConfig::new(',').with_expected_delimiter_count(0);
        assert_eq!(config.expected_delimiter_count, None);

        let config = CheckerConfig::new(',').with_expected_delimiter_count(-4);
        assert_eq!(config.expected_delimiter_count, None);

        let config = CheckerConfig::new(',').with_expected_delimiter_count(3);
        assert_eq!(config.expected_delimiter_count, Some(3));
    }

    #[test]
    fn test_blank_batch_id_is_ignored() {
        assert_eq!(CheckerConfig::new('|').with_batch_id("  ").batch_id, None);
        assert_eq!(
            CheckerConfig::new('|').with_batch_id("TESTBATCH01").batch_id,
            Some("TESTBATCH01".to_string())
        );
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), ',');
        assert_eq!(parse_delimiter("|").unwrap(), '|');
        assert_eq!(parse_delimiter("\\t").unwrap(), '\t');
        assert_eq!(parse_delimiter("tab").unwrap(), '\t');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(",,").is_err());
    }

    #[test]
    fn test_validate_rejects_multibyte_delimiter() {
        let config = CheckerConfig::new('§');
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_quote_delimiter() {
        assert!(CheckerConfig::new('"').validate().is_err());
        assert!(
            CheckerConfig::new(',')
                .with_replacement_delimiter('"')
                .validate()
                .is_err()
        );
        assert!(CheckerConfig::new(',').with_replacement_delimiter('|').validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_line_terminator_replacement() {
        for c in ['\n', '\r'] {
            assert!(matches!(
                CheckerConfig::new(',').with_replacement_delimiter(c).validate(),
                Err(Error::Configuration { .. })
            ));
        }
    }

    #[test]
    fn test_scan_config_validation() {
        let temp_dir = TempDir::new().unwrap();

        let config = ScanConfig::new(temp_dir.path(), CheckerConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.suffix, ".csv");

        let config = ScanConfig::new(temp_dir.path(), CheckerConfig::default()).with_workers(0);
        assert!(config.validate().is_err());

        let config = ScanConfig::new(temp_dir.path().join("missing"), CheckerConfig::default());
        assert!(config.validate().is_err());
    }
}
