//! Error types for table readers and writers

use thiserror::Error;

/// Table I/O errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parsing error at line {line}: {source}")]
    JsonParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} is missing required columns: {missing:?}")]
    MissingColumns { path: String, missing: Vec<String> },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error(transparent)]
    Core(#[from] skucurate_core::Error),
}

/// Result type alias for format operations
pub type Result<T> = std::result::Result<T, Error>;
