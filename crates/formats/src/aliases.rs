//! Alias-group loading from a flat candidate table

use crate::reader::read_table;
use crate::{Error, Result};
use ahash::AHashMap;
use skucurate_core::AliasGroup;
use std::path::Path;
use tracing::info;

/// Column names of the candidate table, already normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasColumns {
    pub sku: String,
    pub description: String,
    /// Optional popularity column; aliases are ordered by it, highest first
    pub order: String,
}

impl Default for AliasColumns {
    fn default() -> Self {
        Self {
            sku: "sku_id".to_string(),
            description: "item_description".to_string(),
            order: "line_order_count".to_string(),
        }
    }
}

fn parse_count(raw: &str, line: usize) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Error::InvalidRecord {
            line,
            message: format!("line_order_count {:?} is not a number", raw),
        })
}

/// Load one [`AliasGroup`] per sku_id, in order of first appearance.
///
/// Blank descriptions stay in the group (they show up in `raw_names`) but
/// a group made only of blanks is an error.
pub fn load_alias_groups<P: AsRef<Path>>(path: P, columns: &AliasColumns) -> Result<Vec<AliasGroup>> {
    let table = read_table(&path, &[columns.sku.as_str(), columns.description.as_str()])?;
    let ordered = table.has_column(&columns.order);

    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut grouped: Vec<(String, Vec<(f64, String)>)> = Vec::new();
    for record in &table.records {
        let sku_id = record.get_or_empty(&columns.sku).trim();
        if sku_id.is_empty() {
            return Err(Error::InvalidRecord {
                line: record.source_line,
                message: "empty sku_id".to_string(),
            });
        }
        let count = if ordered {
            parse_count(record.get_or_empty(&columns.order), record.source_line)?
        } else {
            0.0
        };
        let alias = record.get_or_empty(&columns.description).to_string();

        let slot = *index.entry(sku_id.to_string()).or_insert_with(|| {
            grouped.push((sku_id.to_string(), Vec::new()));
            grouped.len() - 1
        });
        grouped[slot].1.push((count, alias));
    }

    let groups = grouped
        .into_iter()
        .map(|(sku_id, mut aliases)| {
            // stable: equal counts keep file order
            aliases.sort_by(|a, b| b.0.total_cmp(&a.0));
            AliasGroup::new(sku_id, aliases.into_iter().map(|(_, a)| a).collect())
        })
        .collect::<skucurate_core::Result<Vec<_>>>()?;

    info!(
        rows = table.records.len(),
        groups = groups.len(),
        "Loaded alias groups from {:?}",
        path.as_ref()
    );
    Ok(groups)
}
