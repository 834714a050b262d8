//! # plant-forecast
//!
//! Daily sales forecasting per (plant, material).
//!
//! Raw sales rows are cleaned and aggregated into one daily series per
//! group. Each group gets a fixed-budget hyperparameter search over a
//! decomposable trend + seasonality model, a refit with monthly
//! seasonality, a 30-day forecast adjusted to the plant's operating
//! calendar, and an evaluation over its trailing observations. Results are
//! cached per session and browsed from an interactive terminal session.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod policy;
pub mod report;
pub mod session;
pub mod tuning;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{DailySeries, Forecast};
    pub use crate::data::{prepare, GroupKey, GroupedSeries, PreparedData};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{fit_and_forecast, Forecaster, TrialParameters};
    pub use crate::pipeline::{ForecastPipeline, ForecastResult, GroupSettings, ResultsCache};
    pub use crate::tuning::search_best_params;
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
