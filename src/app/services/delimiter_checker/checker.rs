//! Validation run orchestration
//!
//! Wires the record reader, the accumulator, the reporter and the optional
//! replacement-delimiter rewrite into a single pass over one file.

use super::accumulator::Accumulator;
use crate::app::models::{CheckResult, RunOutcome};
use crate::app::services::record_reader::RecordReader;
use crate::app::services::report::Reporter;
use crate::app::services::rewriter;
use crate::app::services::run_log::RunLog;
use crate::config::CheckerConfig;
use crate::constants::PROGRESS_INTERVAL;
use crate::{Error, Result};
use std::path::Path;

/// Validates delimited files against their header record
///
/// A checker holds only configuration; every call to [`check`](Self::check)
/// is an independent run with its own state and log sink.
#[derive(Debug, Clone)]
pub struct DelimiterChecker {
    config: CheckerConfig,
}

impl DelimiterChecker {
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check a file, logging through a fresh [`RunLog`]
    pub fn check(&self, path: &Path) -> Result<CheckResult> {
        let log = RunLog::new(path, self.config.batch_id.as_deref());
        self.check_with_log(path, &log)
    }

    /// Check a file, logging through the supplied sink
    ///
    /// `FileNotFound` and `Decode` failures are logged and returned; no
    /// report is written for a run that did not finish reading.
    pub fn check_with_log(&self, path: &Path, log: &RunLog) -> Result<CheckResult> {
        self.config.validate()?;
        let delimiter = self.config.delimiter_byte()?;

        let reporter = Reporter::new(log, &self.config);
        reporter.log_configuration(path);

        let mut reader =
            RecordReader::open(path, delimiter).inspect_err(|e| log_failure(log, e))?;

        let mut accumulator =
            Accumulator::new(self.config.delimiter, self.config.expected_delimiter_count);

        for record in reader.by_ref() {
            let record = record.inspect_err(|e| log_failure(log, e))?;

            if record.index % PROGRESS_INTERVAL == 0 {
                log.info(format!("Processed {} records...", record.index));
            }

            accumulator.observe(&record);
        }
        log.debug(format!("Read {} records", reader.records_read()));

        let tally = accumulator.finish(self.config.ignore_over_count);

        let mut result = CheckResult {
            path: path.to_path_buf(),
            delimiter: self.config.delimiter,
            outcome: tally.outcome,
            header_delimiter_count: tally.header_delimiter_count.unwrap_or(0),
            expected_delimiter_count: self.config.expected_delimiter_count,
            stats: tally.stats,
            bad_records: tally.bad_records,
            artifact_path: None,
            rewritten_path: None,
        };

        reporter.log_summary(&result);

        if self.config.write_output_file
            && result.outcome != RunOutcome::Good
            && !result.bad_records.is_empty()
        {
            result.artifact_path = Some(reporter.write_artifact(path, &result)?);
        }

        if let Some(replacement) = self.config.replacement_byte()? {
            if result.outcome.is_pass() {
                let written = rewriter::rewrite(path, delimiter, replacement, log)?;
                result.rewritten_path = Some(written);
            } else {
                log.info("Skipping delimiter replacement for BAD file");
            }
        }

        Ok(result)
    }
}

fn log_failure(log: &RunLog, error: &Error) {
    match error {
        Error::FileNotFound { path, source } => {
            log.error(format!("File not found: {} ({})", path.display(), source))
        }
        Error::Decode { record, .. } => {
            log.error(format!("Record: {}", record));
            log.error(format!("Error: {}", error));
        }
        other => log.error(format!("Error: {}", other)),
    }
}
