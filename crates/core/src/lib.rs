//! Core curation logic for SKU alias groups
//!
//! This crate turns noisy alias groups into curated names (typo collapse,
//! canonical token selection, alias ranking and the AUTO rule) and merges
//! reviewed curations into the versioned seed table.

pub mod canonical;
pub mod decision;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod ranking;
pub mod seed;
pub mod typo_collapse;

pub use canonical::{CanonicalTokenSelector, CountMode};
pub use decision::{CurationDecisionEngine, CurationDetail, CurationParams};
pub use error::{Error, Result};
pub use model::{
    AliasGroup, CurationRecord, Decision, OverrideRow, RankedAlias, SeedRow, SeedSource,
    SeedVersion,
};
pub use pipeline::{CurationStats, Pipeline, PipelineBuilder, PipelineConfig};
pub use ranking::{token_sort_ratio, AliasRanker};
pub use seed::{SeedMergeOutcome, SeedMergeStats, SeedMerger};
pub use typo_collapse::{RepresentativeMap, TypoCollapser};
