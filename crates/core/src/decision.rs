//! AUTO / NEED_APPROVAL decisions for one SKU group
//!
//! Composes normalization, typo collapse, canonical token selection and
//! alias ranking, then applies the approval rule: AUTO iff the best score
//! beats the runner-up AND exceeds 80, both strictly.

use crate::canonical::{CanonicalTokenSelector, CountMode};
use crate::model::{AliasGroup, CurationRecord, Decision, RankedAlias};
use crate::ranking::AliasRanker;
use crate::typo_collapse::{RepresentativeMap, TypoCollapser};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use skucurate_filters::TextNormalizer;
use tracing::debug;

/// Minimum best score for an AUTO decision (exclusive)
pub const AUTO_MIN_SCORE: u8 = 80;

/// Tunable curation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationParams {
    pub max_edit_distance: usize,
    pub min_rep_len: usize,
    pub top_m_canonical_tokens: usize,
    pub top_k_original: usize,
    pub count_mode: CountMode,
    /// Fold accents before tokenizing (`café` matches `cafe`)
    pub fold_accents: bool,
}

impl Default for CurationParams {
    fn default() -> Self {
        Self {
            max_edit_distance: 2,
            min_rep_len: 4,
            top_m_canonical_tokens: 2,
            top_k_original: 3,
            count_mode: CountMode::Presence,
            fold_accents: false,
        }
    }
}

impl CurationParams {
    pub fn validate(&self) -> Result<()> {
        if self.top_m_canonical_tokens == 0 {
            return Err(Error::InvalidConfig(
                "top_m_canonical_tokens must be at least 1".to_string(),
            ));
        }
        if self.top_k_original == 0 {
            return Err(Error::InvalidConfig(
                "top_k_original must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Every intermediate result for one group
#[derive(Debug, Clone)]
pub struct CurationDetail {
    pub rep_map: RepresentativeMap,
    pub transformed_aliases: Vec<String>,
    pub canonical_tokens: Vec<String>,
    pub ranked: Vec<RankedAlias>,
    pub record: CurationRecord,
}

/// Per-group curation engine
#[derive(Debug, Clone)]
pub struct CurationDecisionEngine {
    params: CurationParams,
    normalizer: TextNormalizer,
    collapser: TypoCollapser,
    selector: CanonicalTokenSelector,
    ranker: AliasRanker,
}

impl CurationDecisionEngine {
    pub fn new(params: CurationParams) -> Result<Self> {
        let normalizer = if params.fold_accents {
            TextNormalizer::folding()
        } else {
            TextNormalizer::curation()
        };
        Self::with_normalizer(params, normalizer)
    }

    /// Create with a custom text normalizer
    pub fn with_normalizer(params: CurationParams, normalizer: TextNormalizer) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            collapser: TypoCollapser::new(params.max_edit_distance, params.min_rep_len),
            selector: CanonicalTokenSelector::new(params.top_m_canonical_tokens, params.count_mode),
            ranker: AliasRanker::new(normalizer.clone(), params.top_k_original),
            normalizer,
        })
    }

    pub fn params(&self) -> &CurationParams {
        &self.params
    }

    /// Curate one group into its export record
    pub fn curate(&self, group: &AliasGroup) -> CurationRecord {
        self.curate_detailed(group).record
    }

    /// Curate one group, keeping the intermediate results
    pub fn curate_detailed(&self, group: &AliasGroup) -> CurationDetail {
        let aliases = group.usable_aliases();
        let token_lists: Vec<Vec<String>> =
            aliases.iter().map(|a| self.normalizer.tokens(a)).collect();

        let rep_map = self.collapser.build(&token_lists);
        let transformed = rep_map.apply(&token_lists);
        let canonical_tokens = self.selector.select(&transformed);
        let ranked = self.ranker.rank(&aliases, &canonical_tokens, &rep_map);

        let record = decide(group, &ranked);
        debug!(
            sku_id = group.sku_id(),
            decision = %record.decision,
            score = record.match_score,
            "curated group"
        );

        CurationDetail {
            rep_map,
            transformed_aliases: transformed.iter().map(|t| t.join(" ")).collect(),
            canonical_tokens,
            ranked,
            record,
        }
    }
}

/// Apply the approval rule to a ranked alias list
pub fn decide(group: &AliasGroup, ranked: &[RankedAlias]) -> CurationRecord {
    let s1 = ranked.first().map_or(0, |r| r.score);
    let s2 = ranked.get(1).map_or(0, |r| r.score);
    let auto = s1 > s2 && s1 > AUTO_MIN_SCORE;

    let (decision, final_sku_name) = match (auto, ranked.first()) {
        (true, Some(top)) => (Decision::Auto, top.canonicalized.clone()),
        _ => (Decision::NeedApproval, String::new()),
    };

    CurationRecord {
        sku_id: group.sku_id().to_string(),
        raw_names: group.raw_names(),
        match_name: ranked.first().map(|r| r.alias.clone()).unwrap_or_default(),
        match_score: s1,
        final_sku_name,
        decision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(sku: &str, aliases: &[&str]) -> AliasGroup {
        AliasGroup::new(sku, aliases.iter().map(|a| a.to_string()).collect()).unwrap()
    }

    fn ranked(scores: &[u8]) -> Vec<RankedAlias> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| RankedAlias {
                alias: format!("Alias {}", i),
                canonicalized: format!("alias {}", i),
                score,
                frequency: 1,
            })
            .collect()
    }

    #[test]
    fn test_end_to_end_tie_needs_approval() {
        let engine = CurationDecisionEngine::new(CurationParams {
            max_edit_distance: 1,
            top_m_canonical_tokens: 2,
            top_k_original: 2,
            ..Default::default()
        })
        .unwrap();
        let g = group(
            "SKU001",
            &[
                "wireless keybord black",
                "wireless keyboard black",
                "wireless keyboard black",
                "black wireless keyboard",
            ],
        );

        let detail = engine.curate_detailed(&g);

        assert_eq!(detail.rep_map.get("keybord"), Some("keyboard"));
        assert_eq!(detail.canonical_tokens, vec!["keyboard", "wireless"]);
        assert_eq!(detail.ranked.len(), 2);
        assert_eq!(detail.ranked[0].alias, "wireless keyboard black");
        assert_eq!(detail.ranked[0].frequency, 2);
        assert_eq!(detail.ranked[1].alias, "black wireless keyboard");
        assert_eq!(detail.ranked[1].frequency, 1);
        assert_eq!(detail.ranked[0].score, detail.ranked[1].score);

        let record = detail.record;
        assert_eq!(record.decision, Decision::NeedApproval);
        assert_eq!(record.final_sku_name, "");
        assert_eq!(record.match_name, "wireless keyboard black");
        assert_eq!(
            record.raw_names,
            "wireless keybord black,wireless keyboard black,wireless keyboard black,black wireless keyboard"
        );
    }

    #[test]
    fn test_clear_winner_is_auto() {
        let engine = CurationDecisionEngine::new(CurationParams::default()).unwrap();
        let g = group(
            "SKU002",
            &["Ergo Mouse", "ergonomic mouse pad", "Ergo Mouse", "ergo mouse pad"],
        );

        let record = engine.curate(&g);

        // "ergo mouse pad" is the runner-up at 83
        assert_eq!(record.decision, Decision::Auto);
        assert_eq!(record.match_score, 100);
        assert_eq!(record.match_name, "Ergo Mouse");
        assert_eq!(record.final_sku_name, "ergo mouse");
    }

    #[test]
    fn test_rule_is_strict() {
        let g = group("SKU", &["x"]);

        assert_eq!(decide(&g, &ranked(&[81, 80])).decision, Decision::Auto);
        assert_eq!(decide(&g, &ranked(&[81])).decision, Decision::Auto);
        assert_eq!(decide(&g, &ranked(&[80])).decision, Decision::NeedApproval);
        assert_eq!(decide(&g, &ranked(&[95, 95])).decision, Decision::NeedApproval);
        assert_eq!(decide(&g, &[]).decision, Decision::NeedApproval);
    }

    #[test]
    fn test_need_approval_keeps_match_name_only() {
        let g = group("SKU", &["x"]);
        let record = decide(&g, &ranked(&[70, 60]));
        assert_eq!(record.match_name, "Alias 0");
        assert_eq!(record.match_score, 70);
        assert_eq!(record.final_sku_name, "");

        let record = decide(&g, &ranked(&[90, 60]));
        assert_eq!(record.final_sku_name, "alias 0");
    }

    #[test]
    fn test_group_without_tokens() {
        let engine = CurationDecisionEngine::new(CurationParams::default()).unwrap();
        let record = engine.curate(&group("SKU404", &["12345", "---"]));

        assert_eq!(record.decision, Decision::NeedApproval);
        assert_eq!(record.match_name, "");
        assert_eq!(record.match_score, 0);
    }

    #[test]
    fn test_accent_folding_merges_spellings() {
        let aliases = &["Café Crème", "Cafe Creme", "cafe creme"];
        let folded = CurationDecisionEngine::new(CurationParams {
            fold_accents: true,
            ..Default::default()
        })
        .unwrap()
        .curate_detailed(&group("SKU5", aliases));
        assert!(folded.canonical_tokens.iter().all(|t| t.is_ascii()));
        assert_eq!(folded.ranked.len(), 3);
        assert!(folded.ranked.iter().all(|r| r.score == 100));

        let plain = CurationDecisionEngine::new(CurationParams::default())
            .unwrap()
            .curate_detailed(&group("SKU5", aliases));
        // "café crème" vs "cafe creme" shares 8 of 10 chars
        assert_eq!(plain.ranked[2].alias, "Café Crème");
        assert_eq!(plain.ranked[2].score, 80);
    }

    #[test]
    fn test_invalid_params() {
        let params = CurationParams {
            top_k_original: 0,
            ..Default::default()
        };
        assert!(matches!(
            CurationDecisionEngine::new(params),
            Err(Error::InvalidConfig(_))
        ));
    }
}
