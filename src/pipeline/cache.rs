//! Session cache of per-group results.

use super::result::ForecastResult;
use crate::data::GroupKey;
use crate::error::ForecastError;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A group whose run failed, kept so it can be shown as an error state.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFailure {
    pub key: GroupKey,
    pub error: ForecastError,
}

impl fmt::Display for GroupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.error)
    }
}

/// Outcome of one group: a shared result or a failure.
pub type GroupOutcome = std::result::Result<Arc<ForecastResult>, GroupFailure>;

/// Results of one completed training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedResults {
    /// Fingerprint of the input and settings the results were computed from.
    pub fingerprint: u64,
    /// Outcomes keyed by `"{plant}_{material}"`.
    pub outcomes: BTreeMap<String, GroupOutcome>,
}

/// Lifecycle of the cache: nothing until a training run completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CacheState {
    #[default]
    Empty,
    Populated(TrainedResults),
}

/// Answer to a lookup by key.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a> {
    /// No training run has completed yet.
    NotTrained,
    /// Trained, but the key is unknown.
    Missing,
    Ready(&'a Arc<ForecastResult>),
    Failed(&'a GroupFailure),
}

/// Per-session store of training results.
#[derive(Debug, Clone, Default)]
pub struct ResultsCache {
    state: CacheState,
}

impl ResultsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CacheState {
        &self.state
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.state, CacheState::Populated(_))
    }

    /// Fingerprint of the cached run, if any.
    pub fn fingerprint(&self) -> Option<u64> {
        match &self.state {
            CacheState::Empty => None,
            CacheState::Populated(results) => Some(results.fingerprint),
        }
    }

    /// Replace the cached results with a new run.
    pub fn store(&mut self, fingerprint: u64, outcomes: BTreeMap<String, GroupOutcome>) {
        self.state = CacheState::Populated(TrainedResults {
            fingerprint,
            outcomes,
        });
    }

    /// Drop cached results, returning to the untrained state.
    pub fn clear(&mut self) {
        self.state = CacheState::Empty;
    }

    /// Keys of the cached run in display order; `None` before training.
    pub fn keys(&self) -> Option<Vec<&str>> {
        match &self.state {
            CacheState::Empty => None,
            CacheState::Populated(results) => {
                Some(results.outcomes.keys().map(String::as_str).collect())
            }
        }
    }

    pub fn get(&self, key: &str) -> Lookup<'_> {
        match &self.state {
            CacheState::Empty => Lookup::NotTrained,
            CacheState::Populated(results) => match results.outcomes.get(key) {
                None => Lookup::Missing,
                Some(Ok(result)) => Lookup::Ready(result),
                Some(Err(failure)) => Lookup::Failed(failure),
            },
        }
    }

    pub fn outcomes(&self) -> Option<&BTreeMap<String, GroupOutcome>> {
        match &self.state {
            CacheState::Empty => None,
            CacheState::Populated(results) => Some(&results.outcomes),
        }
    }
}
