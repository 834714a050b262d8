//! Numeric utilities shared by the model, the search and the evaluation.

pub mod metrics;
pub mod ridge;
pub mod stats;

pub use metrics::{calculate_metrics, mae, percentage_difference, rmse, AccuracyMetrics};
pub use ridge::{ridge_fit, RidgeResult};
pub use stats::interval_z;
