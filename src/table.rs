//! Tabular content access
//!
//! Classification only ever needs the header row of a file, while session
//! assembly needs the full content of the files it picks. Both go through the
//! [`TableReader`] trait so that callers can plug in their own parser; the
//! crate ships [`CsvTableReader`] as the default.

use std::path::{Path, PathBuf};

use crate::error::{Result, SessionError};

/// Parsed content of a delimited tabular file
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    source: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table from already parsed parts
    pub fn new(source: impl Into<PathBuf>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            source: source.into(),
            headers,
            rows,
        }
    }

    /// File the table was read from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Column headers, as written in the file
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows (header row excluded)
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column whose header equals `name`, ignoring case
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// All values of a column. Short rows yield empty strings.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// A column parsed as floating point; unparsable cells become `None`
    pub fn column_f64(&self, name: &str) -> Option<Vec<Option<f64>>> {
        self.column(name).map(|values| {
            values
                .into_iter()
                .map(|v| v.trim().parse::<f64>().ok())
                .collect()
        })
    }
}

/// Reader for tabular files
///
/// Implementations must report failures as `Err`; the pipeline converts them
/// into "no match" (header sniffing) or an absent stream (full reads).
pub trait TableReader: Send + Sync {
    /// Read only the header row of a file
    fn read_headers(&self, path: &Path) -> Result<Vec<String>>;

    /// Read the whole file
    fn read_table(&self, path: &Path) -> Result<Table>;
}

/// Default [`TableReader`] backed by the `csv` crate
#[derive(Debug, Clone)]
pub struct CsvTableReader {
    delimiter: u8,
}

impl Default for CsvTableReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvTableReader {
    /// Create a reader for comma separated files
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with a custom single-byte delimiter
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    fn open(&self, path: &Path) -> Result<csv::Reader<std::fs::File>> {
        Ok(csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(path)?)
    }

    fn header_row(reader: &mut csv::Reader<std::fs::File>, path: &Path) -> Result<Vec<String>> {
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(SessionError::table(path, "no header row"));
        }
        Ok(headers)
    }
}

impl TableReader for CsvTableReader {
    fn read_headers(&self, path: &Path) -> Result<Vec<String>> {
        let mut reader = self.open(path)?;
        Self::header_row(&mut reader, path)
    }

    fn read_table(&self, path: &Path) -> Result<Table> {
        let mut reader = self.open(path)?;
        let headers = Self::header_row(&mut reader, path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table::new(path, headers, rows))
    }
}
