//! Parallel batch curation
//!
//! Groups are independent, so the whole batch is curated with Rayon and the
//! export is sorted by `sku_id` afterwards. Output never depends on the
//! number of worker threads.

use crate::decision::{CurationDecisionEngine, CurationParams};
use crate::model::{AliasGroup, CurationRecord, Decision};
use crate::{Error, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Batch statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurationStats {
    pub total_groups: usize,
    pub auto: usize,
    pub need_approval: usize,
    pub total_aliases: usize,
}

impl CurationStats {
    pub fn auto_rate(&self) -> f64 {
        if self.total_groups > 0 {
            (self.auto as f64 / self.total_groups as f64) * 100.0
        } else {
            0.0
        }
    }

    fn record(&mut self, group: &AliasGroup, record: &CurationRecord) {
        self.total_groups += 1;
        self.total_aliases += group.aliases().len();
        match record.decision {
            Decision::Auto => self.auto += 1,
            _ => self.need_approval += 1,
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub params: CurationParams,
    /// Number of threads (None = Rayon's global pool)
    pub num_threads: Option<usize>,
}

/// Batch curation over many groups
pub struct Pipeline {
    engine: CurationDecisionEngine,
    pool: Option<rayon::ThreadPool>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let engine = CurationDecisionEngine::new(config.params)?;
        let pool = match config.num_threads {
            Some(0) => {
                return Err(Error::InvalidConfig(
                    "num_threads must be at least 1".to_string(),
                ))
            }
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| Error::InvalidConfig(format!("thread pool: {}", e)))?,
            ),
            None => None,
        };
        Ok(Self { engine, pool })
    }

    pub fn engine(&self) -> &CurationDecisionEngine {
        &self.engine
    }

    /// Curate every group; records come back sorted by sku_id
    pub fn curate_all(&self, groups: &[AliasGroup]) -> (Vec<CurationRecord>, CurationStats) {
        self.curate_all_with_progress(groups, |_| {})
    }

    /// Like [`Pipeline::curate_all`], calling `progress` with the number of
    /// groups finished so far after each one
    pub fn curate_all_with_progress<F>(
        &self,
        groups: &[AliasGroup],
        progress: F,
    ) -> (Vec<CurationRecord>, CurationStats)
    where
        F: Fn(usize) + Sync,
    {
        let done = AtomicUsize::new(0);
        let run = || -> Vec<CurationRecord> {
            groups
                .par_iter()
                .map(|group| {
                    let record = self.engine.curate(group);
                    progress(done.fetch_add(1, Ordering::Relaxed) + 1);
                    record
                })
                .collect()
        };
        let mut records = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let mut stats = CurationStats::default();
        for (group, record) in groups.iter().zip(&records) {
            stats.record(group, record);
        }

        // stable, so repeated sku_ids keep input order
        records.sort_by(|a, b| a.sku_id.cmp(&b.sku_id));

        info!(
            groups = stats.total_groups,
            auto = stats.auto,
            need_approval = stats.need_approval,
            "curated batch"
        );
        (records, stats)
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    pub fn params(mut self, params: CurationParams) -> Self {
        self.config.params = params;
        self
    }

    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = Some(threads);
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        Pipeline::new(self.config)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<AliasGroup> {
        vec![
            AliasGroup::new(
                "SKU003",
                vec!["Ergo Mouse".into(), "ergonomic mouse pad".into(), "Ergo Mouse".into(), "ergo mouse pad".into()],
            )
            .unwrap(),
            AliasGroup::new(
                "SKU001",
                vec![
                    "wireless keybord black".into(),
                    "wireless keyboard black".into(),
                    "wireless keyboard black".into(),
                    "black wireless keyboard".into(),
                ],
            )
            .unwrap(),
            AliasGroup::new("SKU002", vec!["".into(), "12345".into()]).unwrap(),
        ]
    }

    #[test]
    fn test_pipeline_sorts_and_counts() {
        let pipeline = PipelineBuilder::new().build().unwrap();
        let (records, stats) = pipeline.curate_all(&groups());

        let ids: Vec<&str> = records.iter().map(|r| r.sku_id.as_str()).collect();
        assert_eq!(ids, vec!["SKU001", "SKU002", "SKU003"]);
        assert_eq!(stats.total_groups, 3);
        assert_eq!(stats.auto, 1);
        assert_eq!(stats.need_approval, 2);
        assert_eq!(stats.total_aliases, 10);
        assert_eq!(records[2].decision, Decision::Auto);
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        let single = PipelineBuilder::new().num_threads(1).build().unwrap();
        let multi = PipelineBuilder::new().num_threads(4).build().unwrap();

        assert_eq!(single.curate_all(&groups()), multi.curate_all(&groups()));
    }

    #[test]
    fn test_progress_reaches_total() {
        let pipeline = PipelineBuilder::new().build().unwrap();
        let max = AtomicUsize::new(0);
        pipeline.curate_all_with_progress(&groups(), |n| {
            max.fetch_max(n, Ordering::Relaxed);
        });
        assert_eq!(max.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_stats_rates() {
        let stats = CurationStats {
            total_groups: 4,
            auto: 1,
            need_approval: 3,
            total_aliases: 9,
        };
        assert_eq!(stats.auto_rate(), 25.0);
        assert_eq!(CurationStats::default().auto_rate(), 0.0);
    }

    #[test]
    fn test_invalid_thread_count() {
        assert!(matches!(
            PipelineBuilder::new().num_threads(0).build(),
            Err(Error::InvalidConfig(_))
        ));
    }
}
