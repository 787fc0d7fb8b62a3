//! Record comparison and counter accumulation
//!
//! Consumes records one at a time. Only the bad record log and the delimiter
//! distribution grow with the input, bounded by the number of mismatches and
//! the number of distinct delimiter counts respectively.

use crate::app::models::{BadRecordLog, CheckStats, CountClass, Record, RunOutcome};

/// Running comparison state for one file
#[derive(Debug)]
pub struct Accumulator {
    delimiter: char,
    expected_delimiter_count: Option<usize>,
    header_delimiter_count: Option<usize>,
    stats: CheckStats,
    bad_records: BadRecordLog,
}

/// Final state of an accumulator
#[derive(Debug, Clone)]
pub struct Tally {
    /// `None` when the file had no records at all
    pub header_delimiter_count: Option<usize>,
    pub stats: CheckStats,
    pub bad_records: BadRecordLog,
    pub outcome: RunOutcome,
}

impl Accumulator {
    pub fn new(delimiter: char, expected_delimiter_count: Option<usize>) -> Self {
        Self {
            delimiter,
            expected_delimiter_count,
            header_delimiter_count: None,
            stats: CheckStats::new(),
            bad_records: BadRecordLog::new(),
        }
    }

    /// Header delimiter count, once the header has been observed
    pub fn header_delimiter_count(&self) -> Option<usize> {
        self.header_delimiter_count
    }

    /// Compare one record; returns `true` when it was stored as a bad record
    pub fn observe(&mut self, record: &Record) -> bool {
        self.stats.total_records += 1;
        self.stats.max_record_length = self.stats.max_record_length.max(record.length());

        if record.has_nested_delimiter(self.delimiter) {
            self.stats.nested += 1;
        }

        let header = match self.header_delimiter_count {
            Some(header) => header,
            None => {
                // The header seeds the report; it is never counted as bad.
                self.header_delimiter_count = Some(record.delimiter_count());
                self.bad_records.insert(record, self.delimiter);
                return false;
            }
        };

        let detail = record.delimiter_count();
        let class = CountClass::classify(detail, header);
        match class {
            CountClass::Over => self.stats.over += 1,
            CountClass::Equal => self.stats.equal += 1,
            CountClass::Under => self.stats.under += 1,
        }

        let unexpected = self
            .expected_delimiter_count
            .is_some_and(|expected| detail != expected);
        if unexpected {
            self.stats.actual_not_expected += 1;
        }

        self.stats.distribution.record(detail);

        let is_bad = class != CountClass::Equal || unexpected;
        if is_bad {
            if class == CountClass::Equal {
                self.stats.equal_unexpected += 1;
            }
            self.bad_records.insert(record, self.delimiter);
        }

        is_bad
    }

    /// Finish the pass and decide the outcome
    pub fn finish(self, ignore_over_count: bool) -> Tally {
        let outcome = determine_outcome(
            self.header_delimiter_count,
            &self.stats,
            &self.bad_records,
            ignore_over_count,
        );

        Tally {
            header_delimiter_count: self.header_delimiter_count,
            stats: self.stats,
            bad_records: self.bad_records,
            outcome,
        }
    }
}

/// Decide GOOD / FAIR / BAD from accumulated counters
///
/// Over-count mismatches are excused only when ignore-over-count is enabled
/// and not a single under-count record exists. A file without a header is BAD.
pub fn determine_outcome(
    header_delimiter_count: Option<usize>,
    stats: &CheckStats,
    bad_records: &BadRecordLog,
    ignore_over_count: bool,
) -> RunOutcome {
    if header_delimiter_count.is_none() {
        return RunOutcome::Bad;
    }

    if bad_records.bad_count() == 0 {
        RunOutcome::Good
    } else if ignore_over_count && stats.under == 0 && stats.over > 0 {
        RunOutcome::Fair
    } else {
        RunOutcome::Bad
    }
}
