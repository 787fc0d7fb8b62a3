//! Quoted-field-aware record reader
//!
//! Reads a delimited file as a lazy, single-pass sequence of [`Record`]s.
//! Delimiters inside quoted fields do not split the field, and a quoted field
//! may span physical lines. Blank rows are skipped without consuming a record
//! index. The first failure ends the sequence.

use crate::app::models::Record;
use crate::constants::QUOTE_CHAR;
use crate::{Error, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Pull-based reader yielding one [`Record`] per logical row
pub struct RecordReader<R: io::Read> {
    records: csv::StringRecordsIntoIter<R>,
    path: PathBuf,
    index: usize,
    finished: bool,
}

impl RecordReader<File> {
    /// Open a file for reading
    ///
    /// Any open failure (missing file, permissions, not a regular file) is
    /// reported as [`Error::FileNotFound`].
    pub fn open(path: &Path, delimiter: u8) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| Error::file_not_found(path, e))?;
        if !metadata.is_file() {
            return Err(Error::file_not_found(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        let file = File::open(path).map_err(|e| Error::file_not_found(path, e))?;
        Ok(Self::from_reader(file, delimiter, path))
    }
}

impl<R: io::Read> RecordReader<R> {
    /// Wrap any byte source; `path` is used only in error reports
    pub fn from_reader(reader: R, delimiter: u8, path: impl Into<PathBuf>) -> Self {
        let records = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .quote(QUOTE_CHAR)
            .double_quote(true)
            .from_reader(reader)
            .into_records();

        Self {
            records,
            path: path.into(),
            index: 0,
            finished: false,
        }
    }

    /// Index of the last record yielded
    pub fn records_read(&self) -> usize {
        self.index
    }

    fn map_error(&self, error: csv::Error) -> Error {
        let failing_record = self.index + 1;
        match error.into_kind() {
            csv::ErrorKind::Utf8 { .. } => Error::decode(&self.path, failing_record),
            csv::ErrorKind::Io(source) if source.kind() == io::ErrorKind::InvalidData => {
                Error::decode(&self.path, failing_record)
            }
            // Unreadable before the first record: the file was never usable
            csv::ErrorKind::Io(source)
                if failing_record == 1
                    && matches!(
                        source.kind(),
                        io::ErrorKind::IsADirectory | io::ErrorKind::PermissionDenied
                    ) =>
            {
                Error::file_not_found(&self.path, source)
            }
            csv::ErrorKind::Io(source) => Error::io(
                format!(
                    "Failed reading {} at record {}",
                    self.path.display(),
                    failing_record
                ),
                source,
            ),
            other => Error::csv_parsing(
                self.path.display().to_string(),
                format!("Record {}: {:?}", failing_record, other),
                None,
            ),
        }
    }
}

impl<R: io::Read> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.records.next()? {
                Ok(row) => {
                    let fields: Vec<String> = row.iter().map(str::to_string).collect();
                    let record = Record::new(self.index + 1, fields);

                    if record.length() == 0 {
                        continue;
                    }

                    self.index = record.index;
                    trace!("Record {}: {:?}", record.index, record.fields);
                    return Some(Ok(record));
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(self.map_error(e)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read_all(content: &[u8], delimiter: u8) -> Vec<Result<Record>> {
        RecordReader::from_reader(content, delimiter, "test.csv").collect()
    }

    fn field_counts(content: &str, delimiter: u8) -> Vec<usize> {
        read_all(content.as_bytes(), delimiter)
            .into_iter()
            .map(|r| r.unwrap().field_count())
            .collect()
    }

    #[test]
    fn test_plain_records() {
        assert_eq!(
            field_counts("col1,col2,col3\nval1,val2\nval6", b','),
            vec![3, 2, 1]
        );
    }

    #[test]
    fn test_quoted_delimiters_do_not_split() {
        let records: Vec<Record> = read_all(
            b"col1,col2,col3\n\"a,with,commas\",val2,val3\nval4,\"val,with,comma\",val6",
            b',',
        )
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.field_count() == 3));
        assert_eq!(records[1].fields[0], "a,with,commas");
        assert!(records[2].has_nested_delimiter(','));
    }

    #[test]
    fn test_quoted_field_spanning_lines() {
        let records: Vec<Record> = read_all(b"a|b\n\"multi\nline\"|x\nc|d\n", b'|')
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].fields[0], "multi\nline");
        assert_eq!(records[2].index, 3);
    }

    #[test]
    fn test_blank_rows_do_not_consume_index() {
        let records: Vec<Record> = read_all(b"a,b\n\n\nc,d\n\"\"\ne,f\n", b',')
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let indexes: Vec<usize> = records.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        assert_eq!(records[2].fields, vec!["e", "f"]);
    }

    #[test]
    fn test_empty_fields_are_not_blank() {
        assert_eq!(field_counts("a,b,c\n,,\n", b','), vec![3, 3]);
    }

    #[test]
    fn test_invalid_utf8_reports_record_index() {
        let results = read_all(b"a,b\nc,d\ne,\xff\xfe\ng,h\n", b',');

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        match &results[2] {
            Err(Error::Decode { record, .. }) => assert_eq!(*record, 3),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_open_missing_file() {
        let result = RecordReader::open(Path::new("/definitely/not/here.csv"), b',');
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_open_reads_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "h1\th2\nv1\tv2\n").unwrap();

        let mut reader = RecordReader::open(temp_file.path(), b'\t').unwrap();
        let records: Vec<Record> = reader.by_ref().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].delimiter_count(), 1);
        assert_eq!(reader.records_read(), 2);
    }

    #[test]
    fn test_open_directory_is_file_not_found() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = RecordReader::open(temp_dir.path(), b',');
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }
}
