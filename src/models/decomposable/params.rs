//! Hyperparameters of the decomposable model.

use crate::error::{ForecastError, Result};
use serde::Serialize;
use std::fmt;

/// How seasonal components combine with the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    /// `y = trend + seasonal`
    #[default]
    Additive,
    /// `y = trend * (1 + seasonal)`
    Multiplicative,
}

impl SeasonalityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonalityMode::Additive => "additive",
            SeasonalityMode::Multiplicative => "multiplicative",
        }
    }
}

impl fmt::Display for SeasonalityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate hyperparameter configuration.
///
/// Produced by each search trial; the best one is used for the final refit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialParameters {
    pub seasonality_mode: SeasonalityMode,
    /// Flexibility of the trend: larger values allow larger slope changes.
    pub changepoint_prior_scale: f64,
    /// Flexibility of the seasonal components.
    pub seasonality_prior_scale: f64,
    /// Fourier order of the explicitly added monthly seasonality.
    pub fourier_order_monthly: usize,
    pub yearly_seasonality: bool,
    pub weekly_seasonality: bool,
    pub daily_seasonality: bool,
    /// Number of potential changepoints.
    pub n_changepoints: usize,
    /// Fraction of the history in which changepoints may be placed.
    pub changepoint_range: f64,
}

impl Default for TrialParameters {
    fn default() -> Self {
        Self {
            seasonality_mode: SeasonalityMode::Additive,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            fourier_order_monthly: 5,
            yearly_seasonality: true,
            weekly_seasonality: true,
            daily_seasonality: false,
            n_changepoints: 25,
            changepoint_range: 0.8,
        }
    }
}

impl TrialParameters {
    /// Check that every parameter lies in its valid domain.
    pub fn validate(&self) -> Result<()> {
        if !(self.changepoint_prior_scale.is_finite() && self.changepoint_prior_scale > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "changepoint_prior_scale must be positive, got {}",
                self.changepoint_prior_scale
            )));
        }
        if !(self.seasonality_prior_scale.is_finite() && self.seasonality_prior_scale > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonality_prior_scale must be positive, got {}",
                self.seasonality_prior_scale
            )));
        }
        if self.fourier_order_monthly == 0 {
            return Err(ForecastError::InvalidParameter(
                "fourier_order_monthly must be at least 1".to_string(),
            ));
        }
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "changepoint_range must be in (0, 1], got {}",
                self.changepoint_range
            )));
        }
        Ok(())
    }
}

impl fmt::Display for TrialParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mode={} cps={:.4} sps={:.4} monthly_order={} yearly={} weekly={} daily={} n_cp={} cp_range={:.3}",
            self.seasonality_mode,
            self.changepoint_prior_scale,
            self.seasonality_prior_scale,
            self.fourier_order_monthly,
            self.yearly_seasonality,
            self.weekly_seasonality,
            self.daily_seasonality,
            self.n_changepoints,
            self.changepoint_range
        )
    }
}
