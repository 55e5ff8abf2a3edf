//! Ranking original aliases against the canonical tokens
//!
//! Similarity is order-insensitive: both strings are split into tokens,
//! the tokens are sorted and re-joined, and the joined strings are compared
//! with the Indel ratio `2 * LCS / (len_a + len_b)` over characters.

use crate::model::RankedAlias;
use crate::typo_collapse::RepresentativeMap;
use ahash::{AHashMap, AHashSet};
use skucurate_filters::TextNormalizer;
use std::cmp::Ordering;

/// Longest common subsequence length over chars.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    // keep the shorter string in the inner row
    let (a, b) = if a.len() < b.len() { (b, a) } else { (a, b) };
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Indel similarity ratio in [0, 1]; two empty strings are identical.
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(&a, &b)) as f64 / total as f64
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Order-insensitive similarity scaled to 0..=100 and rounded.
///
/// Symmetric; 100 whenever both strings hold the same multiset of tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let ratio = indel_ratio(&sorted_tokens(a), &sorted_tokens(b));
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Scores aliases against a canonical token set
#[derive(Debug, Clone)]
pub struct AliasRanker {
    normalizer: TextNormalizer,
    top_k: usize,
}

impl AliasRanker {
    pub fn new(normalizer: TextNormalizer, top_k: usize) -> Self {
        Self { normalizer, top_k }
    }

    /// Top-K distinct aliases by (score desc, frequency desc).
    ///
    /// Remaining ties fall back to the alias text so the result does not
    /// depend on input order. Blank aliases are skipped; an empty canonical
    /// set ranks nothing.
    pub fn rank(
        &self,
        aliases: &[&str],
        canonical_tokens: &[String],
        reps: &RepresentativeMap,
    ) -> Vec<RankedAlias> {
        if canonical_tokens.is_empty() {
            return Vec::new();
        }
        let target = self.normalizer.normalize(&canonical_tokens.join(" "));

        let mut frequency: AHashMap<&str, usize> = AHashMap::new();
        for alias in aliases {
            *frequency.entry(*alias).or_insert(0) += 1;
        }

        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut scored: Vec<(&str, u8, usize)> = aliases
            .iter()
            .copied()
            .filter(|a| !a.trim().is_empty())
            .filter(|a| seen.insert(*a))
            .map(|a| {
                let score = token_sort_ratio(&self.normalizer.normalize(a), &target);
                (a, score, frequency[a])
            })
            .collect();

        scored.sort_by(|a, b| rank_order(a, b));
        scored
            .into_iter()
            .take(self.top_k)
            .map(|(alias, score, frequency)| RankedAlias {
                alias: alias.to_string(),
                canonicalized: self.canonicalize(alias, reps),
                score,
                frequency,
            })
            .collect()
    }

    /// Retokenize an alias, collapse typos, and join with single spaces
    pub fn canonicalize(&self, alias: &str, reps: &RepresentativeMap) -> String {
        reps.apply_tokens(&self.normalizer.tokens(alias)).join(" ")
    }
}

fn rank_order(a: &(&str, u8, usize), b: &(&str, u8, usize)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| b.2.cmp(&a.2))
        .then_with(|| a.0.cmp(b.0))
}
