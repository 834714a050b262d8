//! Hyperparameter search for the decomposable model.

use super::sampler::{RandomSampler, Sampler};
use super::study::{Study, Trial, TrialRecord};
use crate::core::DailySeries;
use crate::error::{ForecastError, Result};
use crate::models::{build_model, Forecaster, SeasonalityMode, TrialParameters};
use crate::utils::mae;
use serde::Serialize;
use tracing::info;

/// Ranges searched for each hyperparameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpace {
    /// Log-uniform range.
    pub changepoint_prior_scale: (f64, f64),
    /// Log-uniform range.
    pub seasonality_prior_scale: (f64, f64),
    pub fourier_order_monthly: (i64, i64),
    pub n_changepoints: (i64, i64),
    pub changepoint_range: (f64, f64),
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            changepoint_prior_scale: (0.001, 0.5),
            seasonality_prior_scale: (0.01, 10.0),
            fourier_order_monthly: (1, 10),
            n_changepoints: (10, 40),
            changepoint_range: (0.8, 1.0),
        }
    }
}

impl SearchSpace {
    /// Draw one candidate configuration through `trial`.
    pub fn suggest(&self, trial: &mut Trial<'_>) -> TrialParameters {
        let mode = trial.suggest_categorical("seasonality_mode", &["additive", "multiplicative"]);
        let seasonality_mode = if mode == "multiplicative" {
            SeasonalityMode::Multiplicative
        } else {
            SeasonalityMode::Additive
        };

        let (lo, hi) = self.changepoint_prior_scale;
        let changepoint_prior_scale = trial.suggest_float_log("changepoint_prior_scale", lo, hi);
        let (lo, hi) = self.seasonality_prior_scale;
        let seasonality_prior_scale = trial.suggest_float_log("seasonality_prior_scale", lo, hi);
        let (lo, hi) = self.fourier_order_monthly;
        let fourier_order_monthly = trial.suggest_int("fourier_order_monthly", lo, hi);
        let yearly_seasonality = trial.suggest_bool("yearly_seasonality");
        let weekly_seasonality = trial.suggest_bool("weekly_seasonality");
        let daily_seasonality = trial.suggest_bool("daily_seasonality");
        let (lo, hi) = self.n_changepoints;
        let n_changepoints = trial.suggest_int("n_changepoints", lo, hi);
        let (lo, hi) = self.changepoint_range;
        let changepoint_range = trial.suggest_float("changepoint_range", lo, hi);

        TrialParameters {
            seasonality_mode,
            changepoint_prior_scale,
            seasonality_prior_scale,
            fourier_order_monthly: fourier_order_monthly.max(1) as usize,
            yearly_seasonality,
            weekly_seasonality,
            daily_seasonality,
            n_changepoints: n_changepoints.max(0) as usize,
            changepoint_range,
        }
    }
}

/// Result of a hyperparameter search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub best_params: TrialParameters,
    /// In-sample MAE of the best trial.
    pub best_value: f64,
    pub trials: Vec<TrialRecord>,
}

impl SearchOutcome {
    pub fn failed_trials(&self) -> usize {
        self.trials.iter().filter(|t| t.value.is_none()).count()
    }
}

/// In-sample mean absolute error of a model fit with `params`.
pub fn in_sample_mae(
    series: &DailySeries,
    params: &TrialParameters,
    interval_width: f64,
) -> Result<f64> {
    let mut model = build_model(params, interval_width);
    model.fit(series)?;
    let fitted = model.fitted_values().ok_or(ForecastError::FitRequired)?;
    Ok(mae(series.values(), fitted))
}

/// Search the default space with a seeded random sampler.
pub fn search_best_params(
    series: &DailySeries,
    trial_budget: usize,
    seed: u64,
    interval_width: f64,
) -> Result<SearchOutcome> {
    search_with(
        series,
        &SearchSpace::default(),
        RandomSampler::new(seed),
        trial_budget,
        interval_width,
    )
}

/// Run `trial_budget` trials minimising in-sample MAE and return the best.
pub fn search_with<S: Sampler>(
    series: &DailySeries,
    space: &SearchSpace,
    sampler: S,
    trial_budget: usize,
    interval_width: f64,
) -> Result<SearchOutcome> {
    if trial_budget == 0 {
        return Err(ForecastError::InvalidParameter(
            "trial budget must be positive".to_string(),
        ));
    }

    let mut candidates: Vec<TrialParameters> = Vec::with_capacity(trial_budget);
    let mut study = Study::new(sampler);
    study.optimize(trial_budget, |trial| {
        let params = space.suggest(trial);
        candidates.push(params.clone());
        in_sample_mae(series, &params, interval_width)
    });

    let (best_number, best_value) = match study.best_trial() {
        Some(best) => (best.number, best.value.unwrap_or(f64::NAN)),
        None => {
            let last_error = study
                .trials()
                .last()
                .and_then(|t| t.error.clone())
                .unwrap_or_default();
            return Err(ForecastError::SearchFailed {
                trials: trial_budget,
                last_error,
            });
        }
    };

    let best_params = candidates.swap_remove(best_number);
    info!(
        trials = trial_budget,
        best_trial = best_number,
        best_mae = best_value,
        "search finished"
    );

    Ok(SearchOutcome {
        best_params,
        best_value,
        trials: study.into_trials(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::study::TrialState;
    use chrono::{Duration, NaiveDate};

    fn make_series(n: usize) -> DailySeries {
        let base = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let dates = (0..n).map(|i| base + Duration::days(i as i64)).collect();
        let values = (0..n)
            .map(|i| 40.0 + 10.0 * ((i % 7) as f64 / 7.0 * std::f64::consts::TAU).sin())
            .collect();
        DailySeries::new(dates, values).unwrap()
    }

    #[test]
    fn search_runs_full_budget() {
        let series = make_series(60);
        let outcome = search_best_params(&series, 8, 11, 0.8).unwrap();

        assert_eq!(outcome.trials.len(), 8);
        assert!(outcome.best_value.is_finite());
        let best_recorded = outcome
            .trials
            .iter()
            .filter_map(|t| t.value)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(outcome.best_value, best_recorded);
    }

    #[test]
    fn best_params_match_best_trial() {
        let series = make_series(60);
        let outcome = search_best_params(&series, 6, 3, 0.8).unwrap();
        let recomputed = in_sample_mae(&series, &outcome.best_params, 0.8).unwrap();
        assert!((recomputed - outcome.best_value).abs() < 1e-9);
    }

    #[test]
    fn search_is_reproducible_for_a_seed() {
        let series = make_series(45);
        let a = search_best_params(&series, 5, 99, 0.8).unwrap();
        let b = search_best_params(&series, 5, 99, 0.8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn suggested_parameters_lie_in_space() {
        let series = make_series(40);
        let outcome = search_best_params(&series, 20, 5, 0.8).unwrap();
        for trial in &outcome.trials {
            assert_eq!(trial.params.len(), 9);
        }
        let p = &outcome.best_params;
        assert!((0.001..=0.5).contains(&p.changepoint_prior_scale));
        assert!((0.01..=10.0).contains(&p.seasonality_prior_scale));
        assert!((1..=10).contains(&p.fourier_order_monthly));
        assert!((10..=40).contains(&p.n_changepoints));
        assert!((0.8..=1.0).contains(&p.changepoint_range));
    }

    #[test]
    fn search_fails_when_every_trial_fails() {
        let series = DailySeries::new(vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()], vec![1.0])
            .unwrap();
        let err = search_best_params(&series, 3, 1, 0.8).unwrap_err();
        assert!(matches!(err, ForecastError::SearchFailed { trials: 3, .. }));
    }

    #[test]
    fn zero_budget_is_rejected() {
        let series = make_series(40);
        assert!(matches!(
            search_best_params(&series, 0, 1, 0.8),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn trial_states_are_complete_for_healthy_series() {
        let series = make_series(50);
        let outcome = search_best_params(&series, 4, 8, 0.8).unwrap();
        assert!(outcome
            .trials
            .iter()
            .all(|t| t.state == TrialState::Complete));
        assert_eq!(outcome.failed_trials(), 0);
    }
}
