//! Decomposable trend + seasonality model.
//!
//! A piecewise-linear trend with automatically placed changepoints, plus
//! yearly, weekly, daily and custom Fourier seasonalities combined
//! additively or multiplicatively.

mod model;
mod params;
mod seasonality;
mod trend;

pub use model::{DecomposableModel, DEFAULT_INTERVAL_WIDTH};
pub use params::{SeasonalityMode, TrialParameters};
pub use seasonality::{FourierTerm, Seasonality, TermKind};

use crate::core::{DailySeries, Forecast};
use crate::error::Result;
use crate::models::Forecaster;

/// Build the model used for both search trials and the final refit:
/// the given hyperparameters plus a monthly seasonality of the tuned order.
pub fn build_model(params: &TrialParameters, interval_width: f64) -> DecomposableModel {
    DecomposableModel::new(params.clone())
        .add_seasonality(Seasonality::monthly(params.fourier_order_monthly))
        .with_interval_width(interval_width)
}

/// Fit a model with `params` on `series` and forecast `horizon` days ahead.
///
/// The returned frame covers every history date followed by the horizon.
pub fn fit_and_forecast(
    series: &DailySeries,
    params: &TrialParameters,
    horizon: usize,
    interval_width: f64,
) -> Result<Forecast> {
    let mut model = build_model(params, interval_width);
    model.fit(series)?;
    model.predict(horizon)
}
