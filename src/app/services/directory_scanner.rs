//! Directory mode: one isolated validation run per matching file
//!
//! Discovers files by name suffix (optionally recursing), checks them
//! concurrently on blocking tasks, and aggregates per-file outcomes. A fatal
//! error in one file is recorded against that file and never stops its
//! siblings.

use crate::app::models::{CheckResult, RunOutcome};
use crate::app::services::delimiter_checker::DelimiterChecker;
use crate::app::services::report::is_error_artifact;
use crate::app::services::run_log::RunLog;
use crate::config::{CheckerConfig, ScanConfig};
use crate::constants::exit_codes;
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Result of checking one file in directory mode
#[derive(Debug)]
pub enum FileStatus {
    /// The run finished with an outcome
    Checked(CheckResult),
    /// The run aborted (missing file, decode error, ...)
    Failed { message: String, exit_code: i32 },
}

/// Per-file entry of a directory scan
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
}

impl FileReport {
    /// Outcome of the run, if it finished
    pub fn outcome(&self) -> Option<RunOutcome> {
        match &self.status {
            FileStatus::Checked(result) => Some(result.outcome),
            FileStatus::Failed { .. } => None,
        }
    }

    /// BAD outcomes and aborted runs both count as failing files
    pub fn is_failing(&self) -> bool {
        !self.outcome().is_some_and(|o| o.is_pass())
    }
}

/// Aggregated result of a directory scan
#[derive(Debug)]
pub struct ScanSummary {
    pub directory: PathBuf,
    /// Reports sorted by path
    pub files: Vec<FileReport>,
}

impl ScanSummary {
    pub fn files_checked(&self) -> usize {
        self.files.len()
    }

    pub fn count(&self, outcome: RunOutcome) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome() == Some(outcome))
            .count()
    }

    /// Runs that aborted with an error
    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.outcome().is_none()).count()
    }

    /// BAD plus failed runs
    pub fn failing_files(&self) -> usize {
        self.files.iter().filter(|f| f.is_failing()).count()
    }

    pub fn exit_code(&self) -> i32 {
        if self.failing_files() == 0 {
            exit_codes::SUCCESS
        } else {
            exit_codes::BAD_RECORDS
        }
    }
}

/// Runs the delimiter checker over a directory of files
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    config: ScanConfig,
}

impl DirectoryScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Files that directory mode would check, sorted by path
    ///
    /// Earlier `.ERROR_DELIMITER` reports are skipped even when they match
    /// the suffix filter.
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.directory;
        if !root.is_dir() {
            return Err(Error::configuration(format!(
                "Path is not a directory: {}",
                root.display()
            )));
        }

        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(Error::directory_traversal(
                        format!("Cannot read directory {}", root.display()),
                        e,
                    ));
                }
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || is_error_artifact(path) {
                continue;
            }

            let matches_suffix = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.ends_with(&self.config.suffix));
            if matches_suffix {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        debug!(
            "Discovered {} files ending in '{}' under {}",
            files.len(),
            self.config.suffix,
            root.display()
        );

        Ok(files)
    }

    /// Check every discovered file, at most `workers` at a time
    pub async fn scan(&self, progress: Option<&ProgressBar>) -> Result<ScanSummary> {
        self.config.validate()?;
        let files = self.discover_files()?;

        info!(
            "Checking {} files in {} with {} workers",
            files.len(),
            self.config.directory.display(),
            self.config.workers
        );

        if let Some(pb) = progress {
            pb.set_length(files.len() as u64);
        }

        let mut runs = stream::iter(files.into_iter().map(|path| {
            let config = self.config.checker.clone();
            async move {
                let task_path = path.clone();
                let joined = task::spawn_blocking(move || check_one(&task_path, config)).await;
                let status = match joined {
                    Ok(status) => status,
                    Err(e) => FileStatus::Failed {
                        message: format!("Check task failed: {}", e),
                        exit_code: exit_codes::FAILURE,
                    },
                };
                FileReport { path, status }
            }
        }))
        .buffer_unordered(self.config.workers);

        let mut reports = Vec::new();
        while let Some(report) = runs.next().await {
            if let Some(pb) = progress {
                pb.inc(1);
                if let Some(name) = report.path.file_name() {
                    pb.set_message(name.to_string_lossy().to_string());
                }
            }
            reports.push(report);
        }

        reports.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(ScanSummary {
            directory: self.config.directory.clone(),
            files: reports,
        })
    }
}

/// One isolated run with its own log sink
fn check_one(path: &Path, config: CheckerConfig) -> FileStatus {
    let batch_id = run_batch_id(config.batch_id.as_deref(), path);
    let log = RunLog::new(path, Some(&batch_id));

    match DelimiterChecker::new(config).check_with_log(path, &log) {
        Ok(result) => FileStatus::Checked(result),
        Err(e) => FileStatus::Failed {
            message: e.to_string(),
            exit_code: e.exit_code(),
        },
    }
}

/// Batch id for one file: `<batch>:<file name>`, or the file name alone
fn run_batch_id(batch_id: Option<&str>, path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    match batch_id {
        Some(batch) => format!("{}:{}", batch, name),
        None => name,
    }
}
