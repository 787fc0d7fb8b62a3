//! Test utilities for delimiter checker testing
//!
//! This module provides helpers for writing fixture files and building
//! records used across the checker test modules.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::app::models::Record;
use crate::app::services::run_log::RunLog;
use crate::config::CheckerConfig;
use crate::{CheckResult, DelimiterChecker, Result};


pub const GOOD_CONTENT: &str = "col1,col2,col3\nval1,val2,val3\nval4,val5,val6";
pub const BAD_CONTENT: &str = "col1,col2,col3\nval1,val2\nonlyonefield\nval4,val5\nval6";
pub const BAD_UNDER_CONTENT: &str = "col1,col2,col3\nval1,val2\nval4,val5\nval6";
pub const MIXED_CONTENT: &str = "col1,col2,col3\nval1,val2,val3\nval4,val5\nval6\nval7";
pub const OVER_CONTENT: &str = "col1,col2,col3\nval1,val2,val3\nval4,val5,val6,extra\na,b,c,d,e";
pub const NESTED_GOOD_CONTENT: &str =
    "col1,col2,col3\n\"a,with,commas\",val2,val3\nval4,\"val,with,comma\",val6";
pub const NESTED_BAD_CONTENT: &str =
    "col1,col2,col3\n\"a,with,commas\",val2,val3\nval4,\"val,with,comma\",,val6";

/// Temporary directory holding one fixture file
pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

/// Write `content` to `name` inside a fresh temporary directory
pub fn fixture(name: &str, content: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    Fixture { dir, path }
}

/// Run a check with a capturing log, returning the result and the log
pub fn run_check(fixture: &Fixture, config: CheckerConfig) -> (Result<CheckResult>, RunLog) {
    let log = RunLog::new(&fixture.path, config.batch_id.as_deref()).capturing();
    let result = DelimiterChecker::new(config).check_with_log(&fixture.path, &log);
    (result, log)
}

/// Build a record from string slices
pub fn record(index: usize, fields: &[&str]) -> Record {
    Record::new(index, fields.iter().map(|f| f.to_string()).collect())
}

/// Files in the fixture directory other than the input
pub fn sibling_files(fixture: &Fixture) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(fixture.dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p != &fixture.path)
        .collect();
    files.sort();
    files
}
