//! Runs every group and manages the results cache.

use super::cache::{GroupFailure, GroupOutcome, ResultsCache};
use super::group::{forecast_group, GroupSettings};
use crate::data::{GroupKey, GroupedSeries};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{info, warn};

/// What a training request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainOutcome {
    /// Results were computed and stored.
    Computed { succeeded: usize, failed: usize },
    /// Input and settings were unchanged; cached results were kept.
    Reused,
}

/// Sequential per-group forecasting pipeline.
#[derive(Debug, Clone, Default)]
pub struct ForecastPipeline {
    settings: GroupSettings,
}

impl ForecastPipeline {
    pub fn new(settings: GroupSettings) -> Self {
        Self { settings }
    }

    /// Process every group in key order. A failing group is recorded and
    /// does not stop the others.
    pub fn run(&self, groups: &BTreeMap<GroupKey, GroupedSeries>) -> BTreeMap<String, GroupOutcome> {
        let total = groups.len();
        let mut outcomes = BTreeMap::new();

        for (index, (key, group)) in groups.iter().enumerate() {
            info!(group = %key, progress = index + 1, total, "forecasting group");
            let outcome = forecast_group(group, &self.settings)
                .map(Arc::new)
                .map_err(|error| {
                    warn!(group = %key, error = %error, "group failed");
                    GroupFailure { key: *key, error }
                });
            outcomes.insert(key.to_string(), outcome);
        }

        outcomes
    }

    /// Train into `cache` unless it already holds results for this exact input.
    pub fn train(
        &self,
        cache: &mut ResultsCache,
        groups: &BTreeMap<GroupKey, GroupedSeries>,
    ) -> TrainOutcome {
        let fingerprint = self.fingerprint(groups);
        if cache.fingerprint() == Some(fingerprint) {
            info!("input unchanged, reusing cached results");
            return TrainOutcome::Reused;
        }

        let outcomes = self.run(groups);
        let failed = outcomes.values().filter(|o| o.is_err()).count();
        let succeeded = outcomes.len() - failed;
        cache.store(fingerprint, outcomes);
        info!(succeeded, failed, "training finished");

        TrainOutcome::Computed { succeeded, failed }
    }

    /// Hash of every observation and of the settings that shape results.
    ///
    /// Only meaningful within one process: `DefaultHasher` may change between
    /// Rust releases, so the value must not be persisted.
    pub fn fingerprint(&self, groups: &BTreeMap<GroupKey, GroupedSeries>) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.settings.trial_budget.hash(&mut hasher);
        self.settings.horizon.hash(&mut hasher);
        self.settings.evaluation_window.hash(&mut hasher);
        self.settings.seed.hash(&mut hasher);
        self.settings.interval_width.to_bits().hash(&mut hasher);

        groups.len().hash(&mut hasher);
        for (key, group) in groups {
            key.hash(&mut hasher);
            group.series.len().hash(&mut hasher);
            for (date, value) in group.series.iter() {
                date.hash(&mut hasher);
                value.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}
