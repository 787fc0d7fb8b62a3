//! Replacement-delimiter rewrite
//!
//! Re-reads a validated file and writes every record, in order, joined by a
//! new delimiter. Fields that contain the new delimiter, a quote or a line
//! break are quoted so the output keeps the same field counts.

use crate::app::services::record_reader::RecordReader;
use crate::app::services::run_log::RunLog;
use crate::constants::REDELIMITED_FILE_SUFFIX;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Output path for a rewritten file: the input path plus `.redelimited`
pub fn redelimited_path(input: &Path) -> PathBuf {
    let mut path = input.as_os_str().to_owned();
    path.push(REDELIMITED_FILE_SUFFIX);
    PathBuf::from(path)
}

/// Rewrite `input` with `replacement` as the delimiter
///
/// Returns the path of the written file.
pub fn rewrite(input: &Path, delimiter: u8, replacement: u8, log: &RunLog) -> Result<PathBuf> {
    let output = redelimited_path(input);
    let reader = RecordReader::open(input, delimiter)?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(replacement)
        .flexible(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(&output)
        .map_err(|e| {
            Error::csv_parsing(
                output.display().to_string(),
                "Failed to create rewritten file",
                Some(e),
            )
        })?;

    let mut written = 0usize;
    for record in reader {
        let record = record?;
        writer.write_record(&record.fields).map_err(|e| {
            Error::csv_parsing(
                output.display().to_string(),
                format!("Failed to write record {}", record.index),
                Some(e),
            )
        })?;
        written += 1;
    }

    writer
        .flush()
        .map_err(|e| Error::io(format!("Failed to flush {}", output.display()), e))?;

    log.info(format!(
        "Rewrote {} records with delimiter '{}': {}",
        written,
        replacement as char,
        output.display()
    ));

    Ok(output)
}
