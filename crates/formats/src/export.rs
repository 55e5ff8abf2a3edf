//! Curation export writer and reviewed-override reader

use crate::reader::read_table;
use crate::Result;
use chrono::NaiveDate;
use skucurate_core::{CurationRecord, Decision, OverrideRow};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Columns of the curation export, in file order
pub const EXPORT_COLUMNS: [&str; 6] = [
    "sku_id",
    "raw_names",
    "match_name",
    "match_score",
    "final_sku_name",
    "decision",
];

/// Columns a reviewed export must carry
pub const OVERRIDE_COLUMNS: [&str; 3] = ["sku_id", "final_sku_name", "decision"];

/// `sku_name_curation_YYYYMMDD.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("sku_name_curation_{}.csv", date.format("%Y%m%d"))
}

/// Write the curation export, creating parent directories as needed
pub fn write_curation_export<P: AsRef<Path>>(path: P, records: &[CurationRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)?;
    writer.write_record(EXPORT_COLUMNS)?;
    for record in records {
        let score = record.match_score.to_string();
        writer.write_record([
            record.sku_id.as_str(),
            record.raw_names.as_str(),
            record.match_name.as_str(),
            score.as_str(),
            record.final_sku_name.as_str(),
            record.decision.as_str(),
        ])?;
    }
    writer.flush()?;
    info!(rows = records.len(), "Wrote curation export {:?}", path);
    Ok(())
}

/// Read a reviewed export.
///
/// Rows whose decision is not APPROVED, AUTO or NEED_APPROVAL are skipped
/// with a warning; they can never reach the seed.
pub fn read_overrides<P: AsRef<Path>>(path: P) -> Result<Vec<OverrideRow>> {
    let table = read_table(&path, &OVERRIDE_COLUMNS)?;

    let mut rows = Vec::with_capacity(table.records.len());
    for record in &table.records {
        let raw_decision = record.get_or_empty("decision");
        let decision = match raw_decision.parse::<Decision>() {
            Ok(decision) => decision,
            Err(_) => {
                warn!(
                    line = record.source_line,
                    decision = raw_decision,
                    "Skipping row with unknown decision"
                );
                continue;
            }
        };
        rows.push(OverrideRow {
            sku_id: record.get_or_empty("sku_id").to_string(),
            final_sku_name: record.get_or_empty("final_sku_name").to_string(),
            decision,
        });
    }
    Ok(rows)
}
