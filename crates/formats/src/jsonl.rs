//! Streaming JSONL (JSON Lines) table reader
//!
//! Each non-blank line must be a JSON object. Scalar values become cell
//! text (`null` is empty); nested values keep their JSON encoding.

use crate::{Error, Record, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Configuration for JSONL reader
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    /// Buffer size for BufReader
    pub buffer_size: usize,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            buffer_size: 64 * 1024,
        }
    }
}

/// Streaming JSONL reader that processes files line-by-line
pub struct JsonlReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    records: usize,
    bytes_read: u64,
}

impl JsonlReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening JSONL table: {:?}", path);
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> JsonlReader<R> {
    pub fn new(reader: R) -> Self {
        Self::new_with_config(reader, JsonlConfig::default())
    }

    pub fn new_with_config(reader: R, config: JsonlConfig) -> Self {
        Self {
            reader: BufReader::with_capacity(config.buffer_size, reader),
            line_number: 0,
            records: 0,
            bytes_read: 0,
        }
    }

    /// Records yielded so far
    pub fn records_processed(&self) -> usize {
        self.records
    }

    pub fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }

    fn to_record(&self, value: Value) -> Result<Record> {
        let Value::Object(map) = value else {
            return Err(Error::InvalidRecord {
                line: self.line_number,
                message: "expected a JSON object".to_string(),
            });
        };
        let mut record = Record::new(self.line_number);
        for (key, value) in map {
            record.insert(&key, cell_text(value));
        }
        Ok(record)
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl<R: Read> Iterator for JsonlReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();

        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(n) => {
                    self.bytes_read += n as u64;
                    self.line_number += 1;

                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let parsed = serde_json::from_str::<Value>(trimmed)
                        .map_err(|source| Error::JsonParse {
                            line: self.line_number,
                            source,
                        })
                        .and_then(|value| self.to_record(value));
                    if parsed.is_ok() {
                        self.records += 1;
                    }
                    return Some(parsed);
                }
                Err(e) => return Some(Err(Error::Io(e))),
            }
        }
    }
}
