//! Header-normalized table row

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Canonical column name: trimmed, lowercased, inner whitespace runs as `_`
pub fn normalize_header(header: &str) -> String {
    whitespace_regex()
        .replace_all(header.trim(), "_")
        .to_lowercase()
}

/// A single row from a table, keyed by normalized column name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: BTreeMap<String, String>,
    /// 1-based source line of the row
    pub source_line: usize,
}

impl Record {
    pub fn new(source_line: usize) -> Self {
        Self {
            values: BTreeMap::new(),
            source_line,
        }
    }

    /// Insert a cell; the column name is normalized
    pub fn insert(&mut self, column: &str, value: impl Into<String>) {
        self.values.insert(normalize_header(column), value.into());
    }

    /// Cell by normalized column name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Cell value, empty when the row lacks the column
    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
