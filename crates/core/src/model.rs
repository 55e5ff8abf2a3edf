//! Domain records shared by the curation engine and the seed merger

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// All raw aliases observed for one SKU.
///
/// Insertion order and duplicates are kept; at least one alias must be
/// non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasGroup {
    sku_id: String,
    aliases: Vec<String>,
}

impl AliasGroup {
    /// Create a group, rejecting groups without any usable text
    pub fn new(sku_id: impl Into<String>, aliases: Vec<String>) -> Result<Self> {
        let sku_id = sku_id.into();
        if aliases.iter().all(|a| a.trim().is_empty()) {
            return Err(Error::EmptyAliasGroup { sku_id });
        }
        Ok(Self { sku_id, aliases })
    }

    pub fn sku_id(&self) -> &str {
        &self.sku_id
    }

    /// Every alias, blanks included
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Aliases that carry text, in original order
    pub fn usable_aliases(&self) -> Vec<&str> {
        self.aliases
            .iter()
            .map(String::as_str)
            .filter(|a| !a.trim().is_empty())
            .collect()
    }

    /// Aliases joined with `,` for the export's `raw_names` column
    pub fn raw_names(&self) -> String {
        self.aliases.join(",")
    }
}

/// Review state of a curated SKU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Accepted by the machine rule
    Auto,
    /// Ambiguous; waits for a reviewer
    NeedApproval,
    /// Elevated by a reviewer
    Approved,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Auto => "AUTO",
            Decision::NeedApproval => "NEED_APPROVAL",
            Decision::Approved => "APPROVED",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = Error;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "AUTO" => Ok(Decision::Auto),
            "NEED_APPROVAL" => Ok(Decision::NeedApproval),
            "APPROVED" => Ok(Decision::Approved),
            _ => Err(Error::UnknownDecision(s.to_string())),
        }
    }
}

/// One original alias scored against the canonical tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedAlias {
    /// Alias text exactly as it appeared in the input
    pub alias: String,
    /// Alias tokens with typos collapsed, joined by single spaces
    pub canonicalized: String,
    /// Order-insensitive similarity, 0 to 100
    pub score: u8,
    /// Exact-string occurrences in the group
    pub frequency: usize,
}

/// One row of the curation export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurationRecord {
    pub sku_id: String,
    pub raw_names: String,
    pub match_name: String,
    pub match_score: u8,
    pub final_sku_name: String,
    pub decision: Decision,
}

/// Reviewer-facing row read back from an edited export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRow {
    pub sku_id: String,
    pub final_sku_name: String,
    pub decision: Decision,
}

/// Where a seed row's canonical name came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SeedSource {
    ApprovedSeed,
    AutoRef,
    /// Anything else found in a stored seed; kept verbatim
    Other(String),
}

impl SeedSource {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "approved_seed" => SeedSource::ApprovedSeed,
            "auto_ref" => SeedSource::AutoRef,
            other => SeedSource::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SeedSource::ApprovedSeed => "approved_seed",
            SeedSource::AutoRef => "auto_ref",
            SeedSource::Other(s) => s,
        }
    }

    /// Merge priority: approved 2, auto 1, unknown 0
    pub fn priority(&self) -> u8 {
        match self {
            SeedSource::ApprovedSeed => 2,
            SeedSource::AutoRef => 1,
            SeedSource::Other(_) => 0,
        }
    }

    /// Source for a curated decision; `None` for rows that never reach the seed
    pub fn from_decision(decision: Decision) -> Option<Self> {
        match decision {
            Decision::Approved => Some(SeedSource::ApprovedSeed),
            Decision::Auto => Some(SeedSource::AutoRef),
            Decision::NeedApproval => None,
        }
    }
}

impl fmt::Display for SeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the persisted reference table
///
/// `effective_from` and `version` are kept as text so rows written by
/// older runs survive a merge byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRow {
    pub sku_id: String,
    pub canonical_name: String,
    pub source: SeedSource,
    pub effective_from: String,
    pub version: String,
}

/// `vMAJOR.MINOR` seed version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeedVersion {
    pub major: u64,
    pub minor: u64,
}

impl SeedVersion {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Parse `vX` or `vX.Y`; anything else is `None`
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.trim().strip_prefix('v')?;
        let (major, minor) = match rest.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (rest, None),
        };
        let major = parse_digits(major)?;
        let minor = match minor {
            Some(m) => parse_digits(m)?,
            None => 0,
        };
        Some(Self { major, minor })
    }

    /// Parse, falling back to `v0.0` for unparseable or empty strings
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Next minor version; saturates at `u64::MAX`
    pub fn bump_minor(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor.saturating_add(1),
        }
    }
}

// digit runs wider than u64 clamp to u64::MAX so they still sort highest
fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.parse().unwrap_or(u64::MAX))
}

impl fmt::Display for SeedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}
