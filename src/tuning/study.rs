//! Trials and studies: bookkeeping for a fixed-budget minimisation.

use super::sampler::Sampler;
use crate::error::{ForecastError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// A sampled parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Categorical(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{v:.4}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Categorical(v) => f.write_str(v),
        }
    }
}

/// A single trial in progress: suggestions are drawn from the study's sampler
/// and recorded by name.
pub struct Trial<'a> {
    number: usize,
    sampler: &'a mut dyn Sampler,
    params: BTreeMap<String, ParamValue>,
}

impl<'a> Trial<'a> {
    fn new(number: usize, sampler: &'a mut dyn Sampler) -> Self {
        Self {
            number,
            sampler,
            params: BTreeMap::new(),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn suggest_float(&mut self, name: &str, low: f64, high: f64) -> f64 {
        let value = self.sampler.sample_float(name, low, high, false);
        self.params.insert(name.to_string(), ParamValue::Float(value));
        value
    }

    pub fn suggest_float_log(&mut self, name: &str, low: f64, high: f64) -> f64 {
        let value = self.sampler.sample_float(name, low, high, true);
        self.params.insert(name.to_string(), ParamValue::Float(value));
        value
    }

    pub fn suggest_int(&mut self, name: &str, low: i64, high: i64) -> i64 {
        let value = self.sampler.sample_int(name, low, high);
        self.params.insert(name.to_string(), ParamValue::Int(value));
        value
    }

    pub fn suggest_bool(&mut self, name: &str) -> bool {
        let value = self.sampler.sample_choice(name, 2) == 1;
        self.params.insert(name.to_string(), ParamValue::Bool(value));
        value
    }

    /// Pick one of `choices`; panics never, returns the first for an empty list.
    pub fn suggest_categorical<'c>(&mut self, name: &str, choices: &[&'c str]) -> &'c str {
        let idx = self.sampler.sample_choice(name, choices.len());
        let value = choices.get(idx).copied().unwrap_or("");
        self.params
            .insert(name.to_string(), ParamValue::Categorical(value.to_string()));
        value
    }

    pub fn params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialState {
    Complete,
    Failed,
}

/// Outcome of a finished trial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialRecord {
    pub number: usize,
    pub params: BTreeMap<String, ParamValue>,
    pub state: TrialState,
    /// Objective value of a complete trial.
    pub value: Option<f64>,
    /// Error message of a failed trial.
    pub error: Option<String>,
}

/// A minimisation study over a fixed number of trials.
pub struct Study<S: Sampler> {
    sampler: S,
    trials: Vec<TrialRecord>,
}

impl<S: Sampler> Study<S> {
    pub fn new(sampler: S) -> Self {
        Self {
            sampler,
            trials: Vec::new(),
        }
    }

    /// Run `n_trials` trials of `objective`.
    ///
    /// A trial whose objective errors or returns a non-finite value is
    /// recorded as failed; the study carries on with the next trial.
    pub fn optimize<F>(&mut self, n_trials: usize, mut objective: F)
    where
        F: FnMut(&mut Trial<'_>) -> Result<f64>,
    {
        for _ in 0..n_trials {
            let number = self.trials.len();
            let mut trial = Trial::new(number, &mut self.sampler);
            let outcome = objective(&mut trial).and_then(|value| {
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(ForecastError::ComputationError(format!(
                        "objective returned {value}"
                    )))
                }
            });
            let params = trial.params;

            let record = match outcome {
                Ok(value) => {
                    debug!(trial = number, value, "trial complete");
                    TrialRecord {
                        number,
                        params,
                        state: TrialState::Complete,
                        value: Some(value),
                        error: None,
                    }
                }
                Err(err) => {
                    debug!(trial = number, error = %err, "trial failed");
                    TrialRecord {
                        number,
                        params,
                        state: TrialState::Failed,
                        value: None,
                        error: Some(err.to_string()),
                    }
                }
            };
            self.trials.push(record);
        }
    }

    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    /// The complete trial with the lowest value; ties go to the earliest.
    pub fn best_trial(&self) -> Option<&TrialRecord> {
        self.trials
            .iter()
            .filter_map(|t| t.value.map(|v| (t, v)))
            .fold(None, |best: Option<(&TrialRecord, f64)>, (t, v)| match best {
                Some((_, best_v)) if best_v <= v => best,
                _ => Some((t, v)),
            })
            .map(|(t, _)| t)
    }

    pub fn into_trials(self) -> Vec<TrialRecord> {
        self.trials
    }
}
