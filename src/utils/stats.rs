//! Normal quantiles for uncertainty intervals.

use crate::error::{ForecastError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided standard normal quantile for an interval of the given width.
///
/// A width of 0.8 covers the central 80% of the distribution, so the
/// returned z-score is the 0.9 quantile.
///
/// # Example
/// ```
/// use plant_forecast::utils::interval_z;
///
/// let z = interval_z(0.95).unwrap();
/// assert!((z - 1.96).abs() < 0.01);
/// ```
pub fn interval_z(width: f64) -> Result<f64> {
    if !(width > 0.0 && width < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "interval width must be in (0, 1), got {width}"
        )));
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::ComputationError(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + width / 2.0))
}
