//! Summary logging and `.ERROR_DELIMITER` detail reports
//!
//! The reporter turns a finished [`CheckResult`] into human-readable summary
//! lines on the run's [`RunLog`] and, for files that are not GOOD, into a
//! plain-text detail report written next to the input file.

use crate::app::models::CheckResult;
use crate::app::models::RunOutcome;
use crate::app::services::run_log::RunLog;
use crate::config::CheckerConfig;
use crate::constants::{
    BAD_RECORD_REPORTING_THRESHOLD, ERROR_DELIMITER_FILE_SUFFIX, REPORT_TIMESTAMP_FORMAT,
};
use crate::{Error, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static RUN_TIMESTAMP: LazyLock<String> =
    LazyLock::new(|| chrono::Local::now().format(REPORT_TIMESTAMP_FORMAT).to_string());

/// Timestamp shared by every report written during this process
///
/// Captured on first use; the binary touches it at startup.
pub fn run_timestamp() -> &'static str {
    RUN_TIMESTAMP.as_str()
}

/// Suffix appended to input paths: `_YYYY_MM_DD_HH_MM_SS.ERROR_DELIMITER`
pub fn error_file_suffix() -> String {
    format!("_{}{}", run_timestamp(), ERROR_DELIMITER_FILE_SUFFIX)
}

/// Detail report path for an input file
pub fn artifact_path(input: &Path) -> PathBuf {
    let mut path = input.as_os_str().to_owned();
    path.push(error_file_suffix());
    PathBuf::from(path)
}

/// Whether a path names a detail report from an earlier run
pub fn is_error_artifact(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.contains(ERROR_DELIMITER_FILE_SUFFIX))
}

/// Emits run summaries and renders detail reports
#[derive(Debug)]
pub struct Reporter<'a> {
    log: &'a RunLog,
    config: &'a CheckerConfig,
}

impl<'a> Reporter<'a> {
    pub fn new(log: &'a RunLog, config: &'a CheckerConfig) -> Self {
        Self { log, config }
    }

    /// Log the options a run starts with
    pub fn log_configuration(&self, path: &Path) {
        let log = self.log;
        log.info("Delimiter File Checker Initialized");
        log.info(format!("- Delimiter: {}", display_delimiter(self.config.delimiter)));
        log.info(format!("- Filename : {}", path.display()));
        if let Some(expected) = self.config.expected_delimiter_count {
            log.info(format!("- Expected Delimiter Count: {}", expected));
        }
        log.info(format!(
            "- Write Output File if Bad Records Found: {}",
            self.config.write_output_file
        ));
        log.info(format!(
            "- Ignore Over Count Records: {}",
            self.config.ignore_over_count
        ));
        if let Some(replacement) = self.config.replacement_delimiter {
            log.info(format!(
                "- Replacement Delimiter: {}",
                display_delimiter(replacement)
            ));
        }
    }

    /// Log counters, distribution, warnings and the outcome line
    pub fn log_summary(&self, result: &CheckResult) {
        let log = self.log;
        let stats = &result.stats;

        if stats.total_records == 0 {
            log.warn("No header record found (file is empty)");
            log.info("File is BAD");
            return;
        }

        log.info("Delimited Record Counts:");
        log.info("- Header : 1");
        log.info(format!("- Bad    : {}", result.bad_record_count()));
        log.info(format!("  + Under: {}", stats.under));
        log.info(format!("  + Equal: {}", stats.equal_unexpected));
        log.info(format!("  + Over : {}", stats.over));
        log.info(format!("- Nested : {}", stats.nested));
        log.info(format!("- Total  : {}", stats.total_records));

        log.info("Delimiter Counts: (#delimiters: records)");
        log.info(format!("- {}: 1 (header)", result.header_delimiter_count));
        for (count, records) in stats.distribution.iter() {
            log.info(format!("- {}: {}", count, records));
        }

        if let Some(message) = expectation_problem(result) {
            log.warn(message);
        }

        match result.outcome {
            RunOutcome::Good => log.info("File is GOOD"),
            RunOutcome::Fair => log.info(format!(
                "File is FAIR (ignoring {} overcount records)",
                result.bad_record_count()
            )),
            RunOutcome::Bad => {
                log.warn("File is BAD");
                if stats.actual_not_expected > 0 {
                    log.warn("- Possible reasons: correct filename/wrong data or wrong file");
                }
            }
        }

        if result.outcome != RunOutcome::Good
            && result.bad_records.len() > BAD_RECORD_REPORTING_THRESHOLD
        {
            log.info(format!(
                "Bad record count exceeded {} record threshold",
                BAD_RECORD_REPORTING_THRESHOLD
            ));
        }
    }

    /// Write the detail report for a result and log where it went
    pub fn write_artifact(&self, input: &Path, result: &CheckResult) -> Result<PathBuf> {
        let path = artifact_path(input);
        std::fs::write(&path, render_artifact(result)).map_err(|e| {
            Error::io(format!("Failed to write report {}", path.display()), e)
        })?;
        self.log.info(format!("Details: {}", path.display()));
        Ok(path)
    }
}

/// Render the plain-text detail report
pub fn render_artifact(result: &CheckResult) -> String {
    let mut out = String::new();
    let stats = &result.stats;

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Bad Delimited File Check Report:");
    let _ = writeln!(out, "filename       : {}", result.path.display());
    let _ = writeln!(
        out,
        "delimiter value: {}",
        display_delimiter(result.delimiter)
    );
    let _ = writeln!(out, "delimiter count: {:04}", result.header_delimiter_count);
    if let Some(expected) = result.expected_delimiter_count {
        let _ = writeln!(out, "expected  count: {:04}", expected);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Delimiter Record Count Summary:");
    let _ = writeln!(out, "dcnt records");
    let _ = writeln!(out, "---- --------");
    for (count, records) in stats.distribution.iter() {
        let _ = writeln!(out, "{:04}:{:08}", count, records);
    }

    if let Some(message) = expectation_problem(result) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", message);
    }

    let scope = if result.bad_records.len() > BAD_RECORD_REPORTING_THRESHOLD {
        format!("Top {}", BAD_RECORD_REPORTING_THRESHOLD)
    } else {
        "All".to_string()
    };
    let _ = writeln!(out);
    let _ = writeln!(out, "{} Bad Record Delimiter Detail:", scope);
    let _ = writeln!(out, " record#  dcnt data");
    let _ = writeln!(out, "--------- ---- {}", "-".repeat(stats.max_record_length));

    for (position, (key, text)) in result
        .bad_records
        .iter()
        .take(BAD_RECORD_REPORTING_THRESHOLD)
        .enumerate()
    {
        if position == 0 {
            let _ = writeln!(out, "{}:{} (header)", key, text);
        } else {
            let _ = writeln!(out, "{}:{}", key, text);
        }
    }

    out
}

/// Warning for an explicit expectation that disagrees with the header
fn expectation_problem(result: &CheckResult) -> Option<String> {
    match result.expected_delimiter_count {
        Some(expected) if expected != result.header_delimiter_count => Some(format!(
            "*PROBLEM Mismatched Delimiters: Expected {} but found {} records with different delimiter counts",
            expected, result.stats.actual_not_expected
        )),
        _ => None,
    }
}

/// Printable form of a delimiter (TAB is spelled out)
pub fn display_delimiter(delimiter: char) -> String {
    match delimiter {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{BadRecordLog, CheckStats, Record};

    fn result_with(records: &[(usize, &[&str])], expected: Option<usize>) -> CheckResult {
        let mut bad_records = BadRecordLog::new();
        let mut stats = CheckStats::new();
        for (index, fields) in records {
            let record = Record::new(*index, fields.iter().map(|f| f.to_string()).collect());
            stats.max_record_length = stats.max_record_length.max(record.length());
            bad_records.insert(&record, ',');
        }
        stats.total_records = 5;
        stats.under = records.len().saturating_sub(1);
        stats.distribution.record(1);
        stats.distribution.record(0);
        stats.distribution.record(0);

        CheckResult {
            path: PathBuf::from("data/badfile.csv"),
            delimiter: ',',
            outcome: RunOutcome::Bad,
            header_delimiter_count: 2,
            expected_delimiter_count: expected,
            stats,
            bad_records,
            artifact_path: None,
            rewritten_path: None,
        }
    }

    #[test]
    fn test_artifact_path_appends_suffix() {
        let path = artifact_path(Path::new("/tmp/data/file.csv"));
        let name = path.file_name().unwrap().to_str().unwrap();

        assert!(name.starts_with("file.csv_"));
        assert!(name.ends_with(".ERROR_DELIMITER"));
        assert_eq!(path, artifact_path(Path::new("/tmp/data/file.csv")));
        assert!(is_error_artifact(&path));
        assert!(!is_error_artifact(Path::new("/tmp/data/file.csv")));
    }

    #[test]
    fn test_run_timestamp_layout() {
        let ts = run_timestamp();
        assert_eq!(ts.len(), "2026_01_12_08_30_00".len());
        assert_eq!(ts.split('_').count(), 6);
        assert_eq!(ts, run_timestamp());
    }

    #[test]
    fn test_render_artifact_layout() {
        let result = result_with(
            &[
                (1, &["col1", "col2", "col3"]),
                (2, &["val1", "val2"]),
                (3, &["onlyonefield"]),
            ],
            None,
        );
        let text = render_artifact(&result);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Bad Delimited File Check Report:");
        assert_eq!(lines[1], "filename       : data/badfile.csv");
        assert_eq!(lines[2], "delimiter value: ,");
        assert_eq!(lines[3], "delimiter count: 0002");
        assert!(lines.contains(&"0000:00000002"));
        assert!(lines.contains(&"0001:00000001"));
        assert!(lines.contains(&"All Bad Record Delimiter Detail:"));
        assert!(lines.contains(&"000000001.0002:col1,col2,col3 (header)"));
        assert!(lines.contains(&"000000002.0001:val1,val2"));
        assert!(lines.contains(&"000000003.0000:onlyonefield"));
        assert!(!text.contains("expected  count"));
        assert!(!text.contains("*PROBLEM"));
    }

    #[test]
    fn test_render_artifact_expectation_problem() {
        let result = result_with(&[(1, &["a", "b", "c"])], Some(3));
        let text = render_artifact(&result);

        assert!(text.contains("expected  count: 0003"));
        assert!(text.contains("*PROBLEM Mismatched Delimiters: Expected 3"));
    }

    #[test]
    fn test_render_artifact_truncates_at_threshold() {
        let mut rows: Vec<(usize, Vec<String>)> = vec![(1, vec!["h1".into(), "h2".into()])];
        for index in 2..=150 {
            rows.push((index, vec![format!("v{}", index)]));
        }

        let mut result = result_with(&[], None);
        for (index, fields) in rows {
            result.bad_records.insert(&Record::new(index, fields), ',');
        }

        let text = render_artifact(&result);
        let detail_lines = text
            .lines()
            .filter(|l| l.starts_with("000000") && l.contains('.'))
            .count();

        assert!(text.contains("Top 100 Bad Record Delimiter Detail:"));
        assert_eq!(detail_lines, BAD_RECORD_REPORTING_THRESHOLD);
        assert!(text.contains("000000100.0000:v100"));
        assert!(!text.contains("000000101.0000:v101"));
    }

    #[test]
    fn test_log_summary_fair_line() {
        let mut result = result_with(&[(1, &["a", "b", "c"]), (2, &["a", "b", "c", "d"])], None);
        result.outcome = RunOutcome::Fair;
        result.stats.under = 0;
        result.stats.over = 1;

        let log = RunLog::new(&result.path, Some("B1")).capturing();
        let config = CheckerConfig::new(',').with_ignore_over_count();
        Reporter::new(&log, &config).log_summary(&result);

        let lines = log.lines();
        assert!(lines.contains(&"(B1) File is FAIR (ignoring 1 overcount records)".to_string()));
        assert!(lines.contains(&"(B1) - 2: 1 (header)".to_string()));
        assert!(lines.contains(&"(B1)   + Over : 1".to_string()));
    }

    #[test]
    fn test_display_delimiter() {
        assert_eq!(display_delimiter('\t'), "\\t");
        assert_eq!(display_delimiter('|'), "|");
    }
}
