//! Forecast frame holding in-sample and future predictions.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Predictions for every history date followed by the future horizon.
///
/// Row `i < history_len()` lines up with the `i`-th observation of the series
/// the model was fit on; the remaining rows are consecutive days after the
/// last observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    dates: Vec<NaiveDate>,
    yhat: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    trend: Vec<f64>,
    history_len: usize,
}

impl Forecast {
    /// Assemble a forecast frame; all columns must have the same length.
    pub fn new(
        dates: Vec<NaiveDate>,
        yhat: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        trend: Vec<f64>,
        history_len: usize,
    ) -> Result<Self> {
        let n = dates.len();
        for column in [&yhat, &lower, &upper, &trend] {
            if column.len() != n {
                return Err(ForecastError::DimensionMismatch {
                    expected: n,
                    got: column.len(),
                });
            }
        }
        if history_len > n {
            return Err(ForecastError::DimensionMismatch {
                expected: n,
                got: history_len,
            });
        }

        Ok(Self {
            dates,
            yhat,
            lower,
            upper,
            trend,
            history_len,
        })
    }

    /// Total number of rows (history plus horizon).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of in-sample rows.
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// Number of future rows.
    pub fn horizon(&self) -> usize {
        self.len() - self.history_len
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Point predictions.
    pub fn yhat(&self) -> &[f64] {
        &self.yhat
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Trend component.
    pub fn trend(&self) -> &[f64] {
        &self.trend
    }

    /// In-sample point predictions.
    pub fn in_sample(&self) -> &[f64] {
        &self.yhat[..self.history_len]
    }

    /// Future point predictions.
    pub fn future(&self) -> &[f64] {
        &self.yhat[self.history_len..]
    }

    /// Future dates.
    pub fn future_dates(&self) -> &[NaiveDate] {
        &self.dates[self.history_len..]
    }

    /// Set the prediction and interval of row `index` to zero.
    pub fn zero_row(&mut self, index: usize) {
        self.yhat[index] = 0.0;
        self.lower[index] = 0.0;
        self.upper[index] = 0.0;
    }

    /// Replace negative predictions and interval bounds with zero.
    pub fn clamp_non_negative(&mut self) {
        for column in [&mut self.yhat, &mut self.lower, &mut self.upper] {
            for value in column.iter_mut() {
                if *value < 0.0 {
                    *value = 0.0;
                }
            }
        }
    }
}
