//! Core data structures for delimiter checking
//!
//! This module contains the record, bad record bookkeeping, statistics and
//! outcome types shared by the reader, the checker and the reporter.

use crate::constants::exit_codes;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// One logical row of a delimited file
///
/// A record may span several physical lines when a quoted field contains a
/// line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based record index (blank rows do not consume an index)
    pub index: usize,
    /// Parsed fields with quoting removed
    pub fields: Vec<String>,
}

impl Record {
    /// Create a new record
    pub fn new(index: usize, fields: Vec<String>) -> Self {
        Self { index, fields }
    }

    /// Number of parsed fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field count minus one
    pub fn delimiter_count(&self) -> usize {
        self.fields.len().saturating_sub(1)
    }

    /// Character length of the record: field characters plus delimiters
    pub fn length(&self) -> usize {
        let field_chars: usize = self.fields.iter().map(|f| f.chars().count()).sum();
        field_chars + self.delimiter_count()
    }

    /// Fields rejoined with the given delimiter
    pub fn text(&self, delimiter: char) -> String {
        let mut separator = [0u8; 4];
        self.fields.join(delimiter.encode_utf8(&mut separator))
    }

    /// Whether any field carries the delimiter inside its (quoted) content
    pub fn has_nested_delimiter(&self, delimiter: char) -> bool {
        self.fields.iter().any(|f| f.contains(delimiter))
    }
}

/// Composite sort key for bad record entries
///
/// Orders by record index first, then by observed delimiter count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BadRecordKey {
    pub record_index: usize,
    pub delimiter_count: usize,
}

impl BadRecordKey {
    pub fn new(record_index: usize, delimiter_count: usize) -> Self {
        Self {
            record_index,
            delimiter_count,
        }
    }
}

impl fmt::Display for BadRecordKey {
    /// Renders `000000012.0003`; counts of 10,000 or more widen the fraction.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:09}.{:04}", self.record_index, self.delimiter_count)
    }
}

/// Bad record entries of one run, keyed and sorted by [`BadRecordKey`]
///
/// The header is always stored as the first entry so reports show it for
/// context; it never counts as a bad record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadRecordLog {
    entries: BTreeMap<BadRecordKey, String>,
}

impl BadRecordLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record under its composite key
    pub fn insert(&mut self, record: &Record, delimiter: char) {
        let key = BadRecordKey::new(record.index, record.delimiter_count());
        self.entries.insert(key, record.text(delimiter));
    }

    /// Total number of entries, header placeholder included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of true bad records (header placeholder excluded)
    pub fn bad_count(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&BadRecordKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// The header placeholder entry, if a header was seen
    pub fn header(&self) -> Option<(&BadRecordKey, &str)> {
        self.iter().next()
    }
}

/// Occurrences of each delimiter count across detail records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DelimiterDistribution {
    counts: BTreeMap<usize, usize>,
}

impl DelimiterDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more record with this many delimiters
    pub fn record(&mut self, delimiter_count: usize) {
        *self.counts.entry(delimiter_count).or_insert(0) += 1;
    }

    /// Records observed with this many delimiters
    pub fn get(&self, delimiter_count: usize) -> usize {
        self.counts.get(&delimiter_count).copied().unwrap_or(0)
    }

    /// Distinct delimiter counts in ascending order with their occurrences
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    /// Number of distinct delimiter counts
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total records counted
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Relation of a detail record's delimiter count to the header's
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountClass {
    Under,
    Equal,
    Over,
}

impl CountClass {
    pub fn classify(detail: usize, header: usize) -> Self {
        use std::cmp::Ordering;

        match detail.cmp(&header) {
            Ordering::Less => CountClass::Under,
            Ordering::Equal => CountClass::Equal,
            Ordering::Greater => CountClass::Over,
        }
    }
}

/// Counters accumulated over one pass of a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckStats {
    /// Records read, header included
    pub total_records: usize,
    /// Detail records with more delimiters than the header
    pub over: usize,
    /// Detail records with as many delimiters as the header
    pub equal: usize,
    /// Detail records with fewer delimiters than the header
    pub under: usize,
    /// Equal-to-header records that still miss the explicit expectation
    pub equal_unexpected: usize,
    /// Detail records whose count differs from the explicit expectation
    pub actual_not_expected: usize,
    /// Records with a delimiter inside a quoted field
    pub nested: usize,
    /// Longest record length seen
    pub max_record_length: usize,
    /// Delimiter counts of detail records
    pub distribution: DelimiterDistribution,
}

impl CheckStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detail records (header excluded)
    pub fn detail_records(&self) -> usize {
        self.total_records.saturating_sub(1)
    }
}

/// Final outcome of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunOutcome {
    /// No bad records
    Good,
    /// Only over-count mismatches, tolerated by the ignore-over-count policy
    Fair,
    /// At least one mismatch that is not excused
    Bad,
}

impl RunOutcome {
    /// GOOD and FAIR pass the gate
    pub fn is_pass(&self) -> bool {
        !matches!(self, RunOutcome::Bad)
    }

    /// Process exit status for this outcome
    pub fn exit_code(&self) -> i32 {
        if self.is_pass() {
            exit_codes::SUCCESS
        } else {
            exit_codes::BAD_RECORDS
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Good => write!(f, "GOOD"),
            RunOutcome::Fair => write!(f, "FAIR"),
            RunOutcome::Bad => write!(f, "BAD"),
        }
    }
}

/// Everything a validation run produced
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// File that was checked
    pub path: PathBuf,
    /// Delimiter the file was read with
    pub delimiter: char,
    /// Outcome of the run
    pub outcome: RunOutcome,
    /// Header field count minus one
    pub header_delimiter_count: usize,
    /// Explicit expectation, if one was configured
    pub expected_delimiter_count: Option<usize>,
    /// Accumulated counters
    pub stats: CheckStats,
    /// Header placeholder plus every bad record
    #[serde(skip)]
    pub bad_records: BadRecordLog,
    /// Detail report written for this run
    pub artifact_path: Option<PathBuf>,
    /// File rewritten with the replacement delimiter
    pub rewritten_path: Option<PathBuf>,
}

impl CheckResult {
    /// Number of bad detail records
    pub fn bad_record_count(&self) -> usize {
        self.bad_records.bad_count()
    }

    /// Header delimiter count on GOOD/FAIR, `0` on BAD
    pub fn delimiter_count(&self) -> usize {
        if self.outcome.is_pass() {
            self.header_delimiter_count
        } else {
            0
        }
    }

    /// Process exit status for this run
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, fields: &[&str]) -> Record {
        Record::new(index, fields.iter().map(|f| f.to_string()).collect())
    }

    #[test]
    fn test_record_counts_and_length() {
        let rec = record(2, &["a,with,commas", "val2", "val3"]);
        assert_eq!(rec.field_count(), 3);
        assert_eq!(rec.delimiter_count(), 2);
        assert_eq!(rec.length(), 13 + 4 + 4 + 2);
        assert!(rec.has_nested_delimiter(','));
        assert!(!rec.has_nested_delimiter('|'));
        assert_eq!(rec.text(','), "a,with,commas,val2,val3");
    }

    #[test]
    fn test_record_length_counts_characters() {
        let rec = record(1, &["héllo", "wörld"]);
        assert_eq!(rec.length(), 11);
    }

    #[test]
    fn test_bad_record_key_order_and_display() {
        let a = BadRecordKey::new(2, 5);
        let b = BadRecordKey::new(10, 1);
        let c = BadRecordKey::new(10, 3);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a.to_string(), "000000002.0005");
        assert_eq!(BadRecordKey::new(1, 12345).to_string(), "000000001.12345");
    }

    #[test]
    fn test_bad_record_log_excludes_header_from_count() {
        let mut log = BadRecordLog::new();
        assert_eq!(log.bad_count(), 0);

        log.insert(&record(1, &["h1", "h2", "h3"]), ',');
        assert_eq!(log.len(), 1);
        assert_eq!(log.bad_count(), 0);

        log.insert(&record(3, &["only"]), ',');
        log.insert(&record(2, &["a", "b"]), ',');
        assert_eq!(log.bad_count(), 2);

        let keys: Vec<usize> = log.iter().map(|(k, _)| k.record_index).collect();
        assert_eq!(keys, vec![1, 2, 3]);
        assert_eq!(log.header().unwrap().1, "h1,h2,h3");
    }

    #[test]
    fn test_distribution() {
        let mut dist = DelimiterDistribution::new();
        dist.record(2);
        dist.record(1);
        dist.record(2);

        assert_eq!(dist.get(2), 2);
        assert_eq!(dist.get(7), 0);
        assert_eq!(dist.total(), 3);
        assert_eq!(dist.iter().collect::<Vec<_>>(), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_count_class() {
        assert_eq!(CountClass::classify(1, 2), CountClass::Under);
        assert_eq!(CountClass::classify(2, 2), CountClass::Equal);
        assert_eq!(CountClass::classify(3, 2), CountClass::Over);
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(RunOutcome::Good.exit_code(), 0);
        assert_eq!(RunOutcome::Fair.exit_code(), 0);
        assert_eq!(RunOutcome::Bad.exit_code(), 1);
        assert_eq!(RunOutcome::Fair.to_string(), "FAIR");
        assert_eq!(serde_json::to_string(&RunOutcome::Bad).unwrap(), "\"BAD\"");
    }
}
