//! Text preprocessing for SKU alias curation
//!
//! This crate turns raw alias strings into normalized text and
//! alphabetic tokens ready for typo collapse and ranking.

pub mod stopwords;
pub mod text_preprocessing;

pub use text_preprocessing::{normalize, tokens, TextNormalizer};
