//! Per-group forecast bundle.

use super::evaluate::ComparisonRow;
use crate::core::{DailySeries, Forecast};
use crate::data::GroupKey;
use crate::models::TrialParameters;
use crate::tuning::TrialRecord;
use chrono::NaiveDate;
use serde::Serialize;

/// Everything needed to draw a group's chart: observed points and the
/// adjusted forecast frame with its interval band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastFigure {
    pub title: String,
    pub actual_dates: Vec<NaiveDate>,
    pub actual_values: Vec<f64>,
    pub forecast: Forecast,
}

impl ForecastFigure {
    pub fn new(key: GroupKey, series: &DailySeries, forecast: Forecast) -> Self {
        Self {
            title: format!("Plant {} / Material {}", key.plant, key.material),
            actual_dates: series.dates().to_vec(),
            actual_values: series.values().to_vec(),
            forecast,
        }
    }
}

/// Output of tuning, refitting and evaluating one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub key: GroupKey,
    pub best_params: TrialParameters,
    /// In-sample MAE of the best search trial.
    pub search_mae: f64,
    /// Search trials whose fit failed.
    pub failed_trials: usize,
    pub trials: Vec<TrialRecord>,
    pub figure: ForecastFigure,
    /// Error over the trailing evaluation window.
    pub rmse: f64,
    pub mae: f64,
    pub table: Vec<ComparisonRow>,
}

impl ForecastResult {
    pub fn forecast(&self) -> &Forecast {
        &self.figure.forecast
    }
}
