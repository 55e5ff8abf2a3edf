//! Seed table reader and writer

use crate::reader::read_table;
use crate::Result;
use skucurate_core::{SeedRow, SeedSource};
use std::fs;
use std::path::Path;
use tracing::info;

/// Seed columns, in file order
pub const SEED_COLUMNS: [&str; 5] = ["sku_id", "canonical_name", "source", "effective_from", "version"];

/// Read the stored seed; a missing file is an empty seed
pub fn read_seed<P: AsRef<Path>>(path: P) -> Result<Vec<SeedRow>> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No seed at {:?}, starting empty", path);
        return Ok(Vec::new());
    }

    let table = read_table(path, &SEED_COLUMNS)?;
    Ok(table
        .records
        .iter()
        .map(|r| SeedRow {
            sku_id: r.get_or_empty("sku_id").to_string(),
            canonical_name: r.get_or_empty("canonical_name").to_string(),
            source: SeedSource::parse(r.get_or_empty("source")),
            effective_from: r.get_or_empty("effective_from").to_string(),
            version: r.get_or_empty("version").to_string(),
        })
        .collect())
}

/// Write the seed as CSV, creating parent directories as needed
pub fn write_seed<P: AsRef<Path>>(path: P, rows: &[SeedRow]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)?;
    writer.write_record(SEED_COLUMNS)?;
    for row in rows {
        writer.write_record([
            row.sku_id.as_str(),
            row.canonical_name.as_str(),
            row.source.as_str(),
            row.effective_from.as_str(),
            row.version.as_str(),
        ])?;
    }
    writer.flush()?;
    info!(rows = rows.len(), "Wrote seed {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::TempDir;

    #[test]
    fn test_missing_seed_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(read_seed(dir.path().join("ref_sku_names.csv")).unwrap().is_empty());
    }

    #[test]
    fn test_seed_missing_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ref_sku_names.csv");
        fs::write(&path, "sku_id,canonical_name\nSKU1,mouse\n").unwrap();

        match read_seed(&path).unwrap_err() {
            Error::MissingColumns { missing, .. } => {
                assert_eq!(missing, vec!["source", "effective_from", "version"])
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_seed_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dbt/seeds/ref_sku_names.csv");
        let rows = vec![
            SeedRow {
                sku_id: "SKU1".to_string(),
                canonical_name: "Mouse, Wireless".to_string(),
                source: SeedSource::ApprovedSeed,
                effective_from: "2025-08-09".to_string(),
                version: "v0.3".to_string(),
            },
            SeedRow {
                sku_id: "SKU2".to_string(),
                canonical_name: "desk".to_string(),
                source: SeedSource::Other("legacy".to_string()),
                effective_from: String::new(),
                version: String::new(),
            },
        ];

        write_seed(&path, &rows).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("sku_id,canonical_name,source,effective_from,version\n"));
        assert!(text.contains("SKU1,\"Mouse, Wireless\",approved_seed,2025-08-09,v0.3"));

        assert_eq!(read_seed(&path).unwrap(), rows);
    }
}
