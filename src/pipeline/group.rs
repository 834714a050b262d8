//! Tune, refit, adjust and evaluate a single group.

use super::calendar::OperatingCalendar;
use super::evaluate::{comparison_table, evaluate_trailing};
use super::result::{ForecastFigure, ForecastResult};
use crate::data::{GroupKey, GroupedSeries};
use crate::error::{ForecastError, Result};
use crate::models::{fit_and_forecast, DEFAULT_INTERVAL_WIDTH};
use crate::policy::{EVALUATION_WINDOW, FORECAST_HORIZON, TRIAL_BUDGET};
use crate::tuning::{derive_seed, search_best_params};
use tracing::{info, instrument, warn};

/// Knobs of a per-group run. Production runs use [`GroupSettings::from_policy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSettings {
    pub trial_budget: usize,
    pub horizon: usize,
    pub evaluation_window: usize,
    pub seed: u64,
    pub interval_width: f64,
}

impl GroupSettings {
    /// The fixed policy values with the given seed and interval width.
    pub fn from_policy(seed: u64, interval_width: f64) -> Self {
        Self {
            trial_budget: TRIAL_BUDGET,
            horizon: FORECAST_HORIZON,
            evaluation_window: EVALUATION_WINDOW,
            seed,
            interval_width,
        }
    }

    /// Sampler seed for one group.
    pub fn group_seed(&self, key: GroupKey) -> u64 {
        derive_seed(self.seed, ((key.plant as u64) << 32) | key.material as u64)
    }
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self::from_policy(42, DEFAULT_INTERVAL_WIDTH)
    }
}

/// Run search, refit, calendar adjustment and evaluation for one group.
///
/// Groups shorter than the evaluation window fail before any search work.
#[instrument(skip_all, fields(group = %group.key, observations = group.len()))]
pub fn forecast_group(group: &GroupedSeries, settings: &GroupSettings) -> Result<ForecastResult> {
    let series = &group.series;
    if series.len() < settings.evaluation_window {
        return Err(ForecastError::InsufficientData {
            needed: settings.evaluation_window,
            got: series.len(),
        });
    }

    let search = search_best_params(
        series,
        settings.trial_budget,
        settings.group_seed(group.key),
        settings.interval_width,
    )?;
    let failed_trials = search.failed_trials();
    if failed_trials > 0 {
        warn!(failed_trials, trials = search.trials.len(), "some search trials failed");
    }

    let mut forecast = fit_and_forecast(
        series,
        &search.best_params,
        settings.horizon,
        settings.interval_width,
    )?;
    OperatingCalendar::for_plant(group.key.plant).apply(&mut forecast);

    let metrics = evaluate_trailing(series, &forecast, settings.evaluation_window)?;
    let table = comparison_table(group.key, series, &forecast)?;
    info!(rmse = metrics.rmse, mae = metrics.mae, "group evaluated");

    Ok(ForecastResult {
        key: group.key,
        best_params: search.best_params,
        search_mae: search.best_value,
        failed_trials,
        trials: search.trials,
        figure: ForecastFigure::new(group.key, series, forecast),
        rmse: metrics.rmse,
        mae: metrics.mae,
        table,
    })
}
