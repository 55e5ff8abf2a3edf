//! Unified table reader abstraction
//!
//! Provides a common interface for reading tabular files with format
//! detection based on file extensions.

use crate::record::normalize_header;
use crate::{jsonl::JsonlReader, Error, Record, Result};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Trait for table readers providing unified interface
pub trait TableReader: Iterator<Item = Result<Record>> {
    /// Normalized header, when the format declares one up front
    fn declared_columns(&self) -> Option<&[String]>;

    /// Get the number of records processed
    fn records_processed(&self) -> usize;
}

/// CSV table reader
pub struct CsvTableReader {
    records: csv::StringRecordsIntoIter<File>,
    headers: Vec<String>,
    processed: usize,
}

impl CsvTableReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        let headers = reader.headers()?.iter().map(normalize_header).collect();
        Ok(Self {
            records: reader.into_records(),
            headers,
            processed: 0,
        })
    }
}

impl Iterator for CsvTableReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.records.next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(Error::Csv(e))),
        };
        let line = row.position().map_or(0, |p| p.line() as usize);
        let mut record = Record::new(line);
        for (column, value) in self.headers.iter().zip(row.iter()) {
            record.insert(column, value);
        }
        self.processed += 1;
        Some(Ok(record))
    }
}

impl TableReader for CsvTableReader {
    fn declared_columns(&self) -> Option<&[String]> {
        Some(&self.headers)
    }

    fn records_processed(&self) -> usize {
        self.processed
    }
}

/// JSONL table reader wrapper
pub struct JsonlTableReader {
    reader: JsonlReader<File>,
}

impl Iterator for JsonlTableReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next()
    }
}

impl TableReader for JsonlTableReader {
    fn declared_columns(&self) -> Option<&[String]> {
        None
    }

    fn records_processed(&self) -> usize {
        self.reader.records_processed()
    }
}

/// Open a table with automatic format detection
///
/// Supported formats:
/// - `.csv` - comma separated, first row is the header
/// - `.jsonl`, `.json` - JSON Lines format, one object per line
pub fn open_table<P: AsRef<Path>>(path: P) -> Result<Box<dyn TableReader>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| Error::UnsupportedFormat(format!("No file extension found: {:?}", path)))?;

    info!("Opening table: {:?} (format: {})", path, extension);

    match extension.as_str() {
        "csv" => Ok(Box::new(CsvTableReader::open(path)?)),
        "jsonl" | "json" => Ok(Box::new(JsonlTableReader {
            reader: JsonlReader::open(path)?,
        })),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported file extension: {}",
            extension
        ))),
    }
}

/// A fully loaded table
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Normalized column names in first-seen order
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Read a whole table and check that every required column is present.
///
/// For JSON Lines the columns are the union of keys over all rows.
pub fn read_table<P: AsRef<Path>>(path: P, required: &[&str]) -> Result<Table> {
    let path = path.as_ref();
    let mut reader = open_table(path)?;
    let records: Vec<Record> = reader.by_ref().collect::<Result<_>>()?;

    let columns = match reader.declared_columns() {
        Some(columns) => columns.to_vec(),
        None => {
            let mut columns: Vec<String> = Vec::new();
            for column in records.iter().flat_map(Record::columns) {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
            columns
        }
    };
    let table = Table { columns, records };

    let missing: Vec<String> = required
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns {
            path: path.display().to_string(),
            missing,
        });
    }
    Ok(table)
}
