//! Typo collapse by bounded edit distance
//!
//! Every distinct token in a group is mapped to a representative: the first
//! token, in a fixed group-wide preference order, that is either the token
//! itself or a long-enough neighbour within `max_edit_distance`. The order
//! is (frequency desc, length desc, lexicographic asc), so frequent and
//! longer spellings absorb rarer variants.
//!
//! This is a greedy scan, not an optimal clustering. Because the order is
//! global, a token can be absorbed by a preferred neighbour even when it
//! would itself qualify as a representative, and the resulting map is
//! neither symmetric nor transitive.

use ahash::AHashMap;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use strsim::levenshtein;
use tracing::debug;

/// Token -> representative token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepresentativeMap {
    reps: AHashMap<String, String>,
}

impl RepresentativeMap {
    pub fn get(&self, token: &str) -> Option<&str> {
        self.reps.get(token).map(String::as_str)
    }

    /// Representative for `token`; unmapped tokens pass through unchanged
    pub fn representative<'a>(&'a self, token: &'a str) -> &'a str {
        self.get(token).unwrap_or(token)
    }

    /// Rewrite each token list through the map
    pub fn apply(&self, token_lists: &[Vec<String>]) -> Vec<Vec<String>> {
        token_lists
            .iter()
            .map(|tokens| self.apply_tokens(tokens))
            .collect()
    }

    pub fn apply_tokens(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .map(|t| self.representative(t).to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.reps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }

    /// Entries sorted by token, for stable display
    pub fn sorted_entries(&self) -> BTreeMap<&str, &str> {
        self.reps
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl FromIterator<(String, String)> for RepresentativeMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            reps: iter.into_iter().collect(),
        }
    }
}

/// Typo collapse settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypoCollapser {
    /// Maximum Levenshtein distance between a token and its representative
    pub max_edit_distance: usize,
    /// Minimum length (chars) of a representative other than the token itself
    pub min_rep_len: usize,
}

impl Default for TypoCollapser {
    fn default() -> Self {
        Self {
            max_edit_distance: 2,
            min_rep_len: 4,
        }
    }
}

impl TypoCollapser {
    pub fn new(max_edit_distance: usize, min_rep_len: usize) -> Self {
        Self {
            max_edit_distance,
            min_rep_len,
        }
    }

    /// Build the representative map over all tokens of one group
    pub fn build(&self, token_lists: &[Vec<String>]) -> RepresentativeMap {
        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for token in token_lists.iter().flatten() {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
        if counts.is_empty() {
            return RepresentativeMap::default();
        }

        let mut candidates: Vec<(&str, usize, usize)> = counts
            .iter()
            .map(|(&t, &n)| (t, n, t.chars().count()))
            .collect();
        candidates.sort_by(|a, b| candidate_order(a, b));

        let reps: RepresentativeMap = candidates
            .iter()
            .map(|&(token, _, _)| {
                let rep = candidates
                    .iter()
                    .find(|&&(r, _, r_len)| {
                        r == token
                            || (r_len >= self.min_rep_len
                                && levenshtein(token, r) <= self.max_edit_distance)
                    })
                    .map(|&(r, _, _)| r)
                    .unwrap_or(token);
                (token.to_string(), rep.to_string())
            })
            .collect();

        debug!(
            vocabulary = counts.len(),
            collapsed = reps.reps.iter().filter(|(k, v)| k != v).count(),
            "built representative map"
        );
        reps
    }
}

/// (frequency desc, length desc, token asc)
fn candidate_order(a: &(&str, usize, usize), b: &(&str, usize, usize)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| b.2.cmp(&a.2))
        .then_with(|| a.0.cmp(b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|l| l.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_typos_collapse_to_frequent_spelling() {
        let tokens = lists(&[&["keyboard"], &["keyboard"], &["keybord"], &["kayboard"]]);
        let reps = TypoCollapser::new(2, 4).build(&tokens);

        assert_eq!(reps.get("keyboard"), Some("keyboard"));
        assert_eq!(reps.get("keybord"), Some("keyboard"));
        assert_eq!(reps.get("kayboard"), Some("keyboard"));
    }

    #[test]
    fn test_equal_frequency_prefers_longer() {
        let tokens = lists(&[&["keyboard"], &["keybord"], &["kayboard"]]);
        let reps = TypoCollapser::new(2, 4).build(&tokens);

        // keyboard and kayboard tie on (1, 8); keyboard loses the lexicographic tie-break
        assert_eq!(reps.get("kayboard"), Some("kayboard"));
        assert_eq!(reps.get("keyboard"), Some("kayboard"));
        assert_eq!(reps.get("keybord"), Some("kayboard"));
    }

    #[test]
    fn test_frequent_typo_wins() {
        let tokens = lists(&[&["keybord"], &["keybord"], &["keybord"], &["keyboard"]]);
        let reps = TypoCollapser::new(2, 4).build(&tokens);

        assert_eq!(reps.get("keybord"), Some("keybord"));
        assert_eq!(reps.get("keyboard"), Some("keybord"));
    }

    #[test]
    fn test_min_rep_len_blocks_short_representatives() {
        let tokens = lists(&[&["cat"], &["bat"], &["rat"]]);
        let reps = TypoCollapser::new(1, 4).build(&tokens);

        assert_eq!(reps.get("cat"), Some("cat"));
        assert_eq!(reps.get("bat"), Some("bat"));
        assert_eq!(reps.get("rat"), Some("rat"));
    }

    #[test]
    fn test_empty_input() {
        assert!(TypoCollapser::default().build(&[]).is_empty());
        assert!(TypoCollapser::default().build(&lists(&[&[]])).is_empty());
    }

    #[test]
    fn test_self_best_token_maps_to_itself() {
        let tokens = lists(&[&["wireless", "mouse"], &["wireless", "mouse"], &["wireles"]]);
        let reps = TypoCollapser::new(1, 4).build(&tokens);

        assert_eq!(reps.get("wireless"), Some("wireless"));
        assert_eq!(reps.get("mouse"), Some("mouse"));
        assert_eq!(reps.get("wireles"), Some("wireless"));
        assert_eq!(reps.len(), 3);
    }

    #[test]
    fn test_not_symmetric_or_transitive() {
        // "abcd" is preferred; "abce" and "abcf" both collapse into it but
        // neither maps to the other
        let tokens = lists(&[&["abcd", "abcd", "abcd"], &["abce", "abce"], &["abcf"]]);
        let reps = TypoCollapser::new(1, 4).build(&tokens);

        assert_eq!(reps.get("abce"), Some("abcd"));
        assert_eq!(reps.get("abcf"), Some("abcd"));
        assert_ne!(reps.get("abce"), Some("abcf"));
        assert_ne!(reps.get("abcf"), Some("abce"));
    }

    #[test]
    fn test_greedy_global_order_absorbs_eligible_token() {
        // "boxes" would be a valid representative on its own, but "boxer"
        // comes first in the global order and is within distance 1
        let tokens = lists(&[&["boxer", "boxer"], &["boxes"], &["boxen"]]);
        let reps = TypoCollapser::new(1, 4).build(&tokens);

        assert_eq!(reps.get("boxes"), Some("boxer"));
        assert_eq!(reps.get("boxen"), Some("boxer"));
    }

    #[test]
    fn test_apply_passes_unknown_tokens_through() {
        let reps: RepresentativeMap = vec![
            ("hello".to_string(), "hi".to_string()),
            ("world".to_string(), "earth".to_string()),
        ]
        .into_iter()
        .collect();
        let out = reps.apply(&lists(&[&["hello", "world"], &["test", "case"]]));
        assert_eq!(out, lists(&[&["hi", "earth"], &["test", "case"]]));
    }
}
