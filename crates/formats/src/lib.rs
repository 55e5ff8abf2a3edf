//! Table readers and writers for SKU curation
//!
//! Reads candidate, reviewed-export and seed tables from CSV or JSON Lines
//! and writes the curation export and the seed as CSV.

pub mod aliases;
pub mod error;
pub mod export;
pub mod jsonl;
pub mod reader;
pub mod record;
pub mod seed;

pub use aliases::{load_alias_groups, AliasColumns};
pub use error::{Error, Result};
pub use export::{export_file_name, read_overrides, write_curation_export};
pub use reader::{open_table, read_table, Table, TableReader};
pub use record::Record;
pub use seed::{read_seed, write_seed};
