//! Header-versus-detail delimiter count validation
//!
//! This module runs one validation pass over a delimited file: the first
//! record fixes the expected delimiter count, every following record is
//! compared against it, and the run ends in a GOOD, FAIR or BAD outcome.
//!
//! ## Architecture
//!
//! - [`accumulator`] - Record-by-record comparison and counters
//! - [`checker`] - Run orchestration: reading, reporting, optional rewrite
//!
//! ## Usage
//!
//! ```rust,no_run
//! use delimiter_checker::{CheckerConfig, DelimiterChecker, RunOutcome};
//!
//! # fn example() -> delimiter_checker::Result<()> {
//! let config = CheckerConfig::new(',').with_output_file();
//! let result = DelimiterChecker::new(config).check(std::path::Path::new("data.csv"))?;
//!
//! if result.outcome == RunOutcome::Bad {
//!     println!("{} bad records", result.bad_record_count());
//! }
//! # Ok(())
//! # }
//! ```

pub mod accumulator;
pub mod checker;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use accumulator::{Accumulator, Tally, determine_outcome};
pub use checker::DelimiterChecker;
