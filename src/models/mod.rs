//! Forecasting models.

mod traits;

pub mod decomposable;

pub use decomposable::{
    build_model, fit_and_forecast, DecomposableModel, SeasonalityMode, TrialParameters,
    DEFAULT_INTERVAL_WIDTH,
};
pub use traits::{BoxedForecaster, Forecaster};
