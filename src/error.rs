//! Error types for the plant-forecast library.

use thiserror::Error;

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while preparing data, fitting models or running searches.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Date-related error.
    #[error("date error: {0}")]
    DateError(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Non-finite values detected when not allowed.
    #[error("non-finite values detected in data")]
    NonFiniteValues,

    /// Computation error (e.g., a singular system).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Every trial of a hyperparameter search failed.
    #[error("search failed: all {trials} trials failed (last error: {last_error})")]
    SearchFailed { trials: usize, last_error: String },

    /// A group key could not be parsed.
    #[error("invalid group key '{0}': expected '<plant>_<material>'")]
    InvalidGroupKey(String),

    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// The CSV input was malformed.
    #[error("csv error: {0}")]
    Csv(String),
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Io(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Csv(err.to_string())
    }
}
