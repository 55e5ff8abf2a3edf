//! Canonical token selection

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// How token frequency is counted across aliases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// A token counts at most once per alias
    #[default]
    Presence,
    /// Every repeat counts
    Occurrence,
}

/// Picks the top-M tokens describing a group after typo collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalTokenSelector {
    pub top_m: usize,
    pub mode: CountMode,
}

impl CanonicalTokenSelector {
    pub fn new(top_m: usize, mode: CountMode) -> Self {
        Self { top_m, mode }
    }

    /// Rank tokens by (count desc, length desc, token asc) and keep the first `top_m`.
    ///
    /// Empty iff every token list is empty.
    pub fn select(&self, transformed: &[Vec<String>]) -> Vec<String> {
        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for tokens in transformed {
            match self.mode {
                CountMode::Presence => {
                    let unique: AHashSet<&str> = tokens.iter().map(String::as_str).collect();
                    for token in unique {
                        *counts.entry(token).or_insert(0) += 1;
                    }
                }
                CountMode::Occurrence => {
                    for token in tokens {
                        *counts.entry(token.as_str()).or_insert(0) += 1;
                    }
                }
            }
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| b.0.chars().count().cmp(&a.0.chars().count()))
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
            .into_iter()
            .take(self.top_m)
            .map(|(t, _)| t.to_string())
            .collect()
    }
}

impl Default for CanonicalTokenSelector {
    fn default() -> Self {
        Self::new(5, CountMode::Presence)
    }
}
