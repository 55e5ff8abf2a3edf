//! Versioned, priority-aware merge of curated names into the seed table
//!
//! Incoming rows replace stored rows for the same `sku_id` when their source
//! priority is at least as high (approved_seed 2, auto_ref 1, other 0), so a
//! re-curation from the same source refreshes the row while an auto_ref row
//! can never downgrade an approved_seed row. Every touched row gets the same
//! run-level `version` and `effective_from`.

use crate::model::{OverrideRow, SeedRow, SeedSource, SeedVersion};
use crate::{Error, Result};
use ahash::{AHashMap, AHashSet};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Counters for one merge run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedMergeStats {
    /// Rows added for previously unseen sku_ids
    pub inserted: usize,
    /// Stored rows overwritten by an incoming row
    pub replaced: usize,
    /// Incoming rows dropped because a higher-priority row exists
    pub kept: usize,
    /// Override rows still waiting for review
    pub skipped_need_approval: usize,
}

/// Result of a merge: the full seed, sorted by sku_id
#[derive(Debug, Clone)]
pub struct SeedMergeOutcome {
    pub rows: Vec<SeedRow>,
    pub version: String,
    pub effective_from: String,
    pub stats: SeedMergeStats,
}

/// Run-level merge settings
#[derive(Debug, Clone, Default)]
pub struct SeedMerger {
    /// Explicit version stamp; auto-bumped when `None`
    pub version: Option<String>,
    /// Effective date; today when `None`
    pub effective_from: Option<NaiveDate>,
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Next version after the highest one in the stored seed.
///
/// Unparseable versions count as `v0.0`; an empty seed yields `v0.1`.
pub fn next_version(existing: &[SeedRow]) -> SeedVersion {
    existing
        .iter()
        .map(|row| SeedVersion::parse_or_default(&row.version))
        .max()
        .unwrap_or_default()
        .bump_minor()
}

impl SeedMerger {
    pub fn new(version: Option<String>, effective_from: Option<NaiveDate>) -> Self {
        Self {
            version,
            effective_from,
        }
    }

    /// Turn reviewed overrides into seed rows stamped for this run.
    ///
    /// Only APPROVED and AUTO rows become seed rows.
    pub fn incoming_rows(
        &self,
        overrides: &[OverrideRow],
        version: &str,
        effective_from: &str,
        stats: &mut SeedMergeStats,
    ) -> Result<Vec<SeedRow>> {
        let mut rows = Vec::with_capacity(overrides.len());
        for row in overrides {
            let Some(source) = SeedSource::from_decision(row.decision) else {
                stats.skipped_need_approval += 1;
                continue;
            };
            rows.push(SeedRow {
                sku_id: row.sku_id.trim().to_string(),
                canonical_name: row.final_sku_name.trim().to_string(),
                source,
                effective_from: effective_from.to_string(),
                version: version.to_string(),
            });
        }

        let blank_ids = rows.iter().filter(|r| r.sku_id.is_empty()).count();
        if blank_ids > 0 {
            return Err(Error::EmptySkuId { count: blank_ids });
        }
        let unnamed: Vec<String> = rows
            .iter()
            .filter(|r| r.canonical_name.is_empty())
            .map(|r| r.sku_id.clone())
            .collect();
        if !unnamed.is_empty() {
            return Err(Error::EmptyCanonicalName {
                count: unnamed.len(),
                sku_ids: unnamed,
            });
        }
        Ok(rows)
    }

    /// Merge reviewed overrides into the stored seed.
    ///
    /// Nothing is returned unless the merged seed passes validation, so a
    /// failed merge never produces a partial table.
    pub fn merge(&self, existing: Vec<SeedRow>, overrides: &[OverrideRow]) -> Result<SeedMergeOutcome> {
        let version = match &self.version {
            Some(v) => v.trim().to_string(),
            None => next_version(&existing).to_string(),
        };
        let effective_from = self
            .effective_from
            .unwrap_or_else(|| chrono::Local::now().date_naive())
            .format("%Y-%m-%d")
            .to_string();

        let mut stats = SeedMergeStats::default();
        let incoming = self.incoming_rows(overrides, &version, &effective_from, &mut stats)?;

        // stored duplicates stay in place so validation can reject them
        let mut merged = existing;
        let mut index: AHashMap<String, usize> = AHashMap::new();
        for (i, row) in merged.iter().enumerate() {
            index.entry(row.sku_id.clone()).or_insert(i);
        }

        for row in incoming {
            match index.get(&row.sku_id) {
                None => {
                    debug!(sku_id = %row.sku_id, source = %row.source, "inserting seed row");
                    index.insert(row.sku_id.clone(), merged.len());
                    merged.push(row);
                    stats.inserted += 1;
                }
                Some(&i) if row.source.priority() >= merged[i].source.priority() => {
                    debug!(sku_id = %row.sku_id, source = %row.source, "replacing seed row");
                    merged[i] = row;
                    stats.replaced += 1;
                }
                Some(&i) => {
                    debug!(
                        sku_id = %row.sku_id,
                        incoming = %row.source,
                        existing = %merged[i].source,
                        "keeping higher-priority seed row"
                    );
                    stats.kept += 1;
                }
            }
        }

        merged.sort_by(|a, b| a.sku_id.cmp(&b.sku_id));
        validate_seed(&merged)?;

        info!(
            rows = merged.len(),
            inserted = stats.inserted,
            replaced = stats.replaced,
            kept = stats.kept,
            version = %version,
            "merged seed"
        );

        Ok(SeedMergeOutcome {
            rows: merged,
            version,
            effective_from,
            stats,
        })
    }
}

/// Check the seed invariants: unique sku_id, non-empty canonical_name
pub fn validate_seed(rows: &[SeedRow]) -> Result<()> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut duplicates: Vec<String> = rows
        .iter()
        .filter(|r| !seen.insert(r.sku_id.as_str()))
        .map(|r| r.sku_id.clone())
        .collect();
    if !duplicates.is_empty() {
        duplicates.sort();
        duplicates.dedup();
        return Err(Error::DuplicateSkuId(duplicates));
    }

    let unnamed: Vec<String> = rows
        .iter()
        .filter(|r| r.canonical_name.trim().is_empty())
        .map(|r| r.sku_id.clone())
        .collect();
    if !unnamed.is_empty() {
        return Err(Error::EmptyCanonicalName {
            count: unnamed.len(),
            sku_ids: unnamed,
        });
    }
    Ok(())
}
