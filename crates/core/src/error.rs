//! Error types for the curation engine

use thiserror::Error;

/// Curation and seed-merge errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Alias group {sku_id:?} has no non-blank alias")]
    EmptyAliasGroup { sku_id: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Empty sku_id in {count} incoming row(s)")]
    EmptySkuId { count: usize },

    #[error("Duplicate sku_id in final seed: {0:?}")]
    DuplicateSkuId(Vec<String>),

    #[error("Empty canonical_name for {count} row(s): {sku_ids:?}")]
    EmptyCanonicalName { count: usize, sku_ids: Vec<String> },

    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown decision {0:?}, expected APPROVED, AUTO or NEED_APPROVAL")]
    UnknownDecision(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
