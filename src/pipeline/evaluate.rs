//! Trailing-window evaluation and the actual-vs-predicted comparison table.

use crate::core::{DailySeries, Forecast};
use crate::data::GroupKey;
use crate::error::{ForecastError, Result};
use crate::utils::{calculate_metrics, percentage_difference, AccuracyMetrics};
use chrono::NaiveDate;
use serde::Serialize;

/// One observation next to its prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub date: NaiveDate,
    pub plant: u32,
    pub material: u32,
    pub actual: f64,
    pub predicted: f64,
    /// `actual - predicted`
    pub difference: f64,
    /// `difference / actual * 100`; `None` when actual is zero.
    pub percentage_difference: Option<f64>,
}

fn check_alignment(series: &DailySeries, forecast: &Forecast) -> Result<()> {
    if forecast.history_len() != series.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: series.len(),
            got: forecast.history_len(),
        });
    }
    if &forecast.dates()[..series.len()] != series.dates() {
        return Err(ForecastError::DateError(
            "forecast history does not line up with the series".to_string(),
        ));
    }
    Ok(())
}

/// Compare the last `window` observations with the forecast at the same dates.
///
/// Fails with `InsufficientData` when the series is shorter than the window.
pub fn evaluate_trailing(
    series: &DailySeries,
    forecast: &Forecast,
    window: usize,
) -> Result<AccuracyMetrics> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(
            "evaluation window must be positive".to_string(),
        ));
    }
    if series.len() < window {
        return Err(ForecastError::InsufficientData {
            needed: window,
            got: series.len(),
        });
    }
    check_alignment(series, forecast)?;

    let start = series.len() - window;
    calculate_metrics(
        &series.values()[start..],
        &forecast.in_sample()[start..],
    )
}

/// Build one row per observation of the group.
pub fn comparison_table(
    key: GroupKey,
    series: &DailySeries,
    forecast: &Forecast,
) -> Result<Vec<ComparisonRow>> {
    check_alignment(series, forecast)?;

    Ok(series
        .iter()
        .zip(forecast.in_sample())
        .map(|((date, actual), &predicted)| ComparisonRow {
            date,
            plant: key.plant,
            material: key.material,
            actual,
            predicted,
            difference: actual - predicted,
            percentage_difference: percentage_difference(actual, predicted),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Duration;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let base = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    fn forecast_for(series: &DailySeries, yhat: Vec<f64>, horizon: usize) -> Forecast {
        let mut all_dates = series.dates().to_vec();
        let last = series.end().unwrap();
        all_dates.extend((1..=horizon as i64).map(|h| last + Duration::days(h)));
        let n = all_dates.len();
        let mut yhat = yhat;
        yhat.resize(n, 0.0);
        Forecast::new(
            all_dates,
            yhat.clone(),
            yhat.clone(),
            yhat.clone(),
            yhat,
            series.len(),
        )
        .unwrap()
    }

    #[test]
    fn evaluates_only_the_trailing_window() {
        let values: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let series = DailySeries::new(dates(40), values.clone()).unwrap();

        // Large errors before the window, exact predictions inside it.
        let mut yhat = values.clone();
        for v in yhat.iter_mut().take(10) {
            *v += 100.0;
        }
        let forecast = forecast_for(&series, yhat, 30);

        let metrics = evaluate_trailing(&series, &forecast, 30).unwrap();
        assert_relative_eq!(metrics.mae, 0.0);
        assert_relative_eq!(metrics.rmse, 0.0);
    }

    #[test]
    fn computes_rmse_and_mae() {
        let series = DailySeries::new(dates(4), vec![10.0, 10.0, 10.0, 10.0]).unwrap();
        let forecast = forecast_for(&series, vec![10.0, 12.0, 8.0, 10.0], 2);

        let metrics = evaluate_trailing(&series, &forecast, 4).unwrap();
        assert_relative_eq!(metrics.mae, 1.0);
        assert_relative_eq!(metrics.rmse, 2.0_f64.sqrt());
    }

    #[test]
    fn short_history_is_insufficient() {
        let series = DailySeries::new(dates(12), vec![1.0; 12]).unwrap();
        let forecast = forecast_for(&series, vec![1.0; 12], 30);
        assert_eq!(
            evaluate_trailing(&series, &forecast, 30).unwrap_err(),
            ForecastError::InsufficientData { needed: 30, got: 12 }
        );
    }

    #[test]
    fn misaligned_forecast_is_rejected() {
        let series = DailySeries::new(dates(5), vec![1.0; 5]).unwrap();
        let other = DailySeries::new(dates(6), vec![1.0; 6]).unwrap();
        let forecast = forecast_for(&other, vec![1.0; 6], 0);
        assert!(evaluate_trailing(&series, &forecast, 5).is_err());
        assert!(comparison_table(GroupKey::new(1, 2), &series, &forecast).is_err());
    }

    #[test]
    fn table_rows_carry_differences() {
        let series = DailySeries::new(dates(3), vec![50.0, 0.0, 20.0]).unwrap();
        let forecast = forecast_for(&series, vec![40.0, 5.0, 25.0], 1);

        let rows = comparison_table(GroupKey::new(102, 101), &series, &forecast).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].plant, 102);
        assert_eq!(rows[0].material, 101);
        assert_relative_eq!(rows[0].difference, 10.0);
        assert_relative_eq!(rows[0].percentage_difference.unwrap(), 20.0);

        assert_relative_eq!(rows[1].difference, -5.0);
        assert_eq!(rows[1].percentage_difference, None);

        assert_relative_eq!(rows[2].percentage_difference.unwrap(), -25.0);
    }

    #[test]
    fn null_percentages_serialize_as_null() {
        let series = DailySeries::new(dates(1), vec![0.0]).unwrap();
        let forecast = forecast_for(&series, vec![3.0], 0);
        let rows = comparison_table(GroupKey::new(101, 101), &series, &forecast).unwrap();
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert!(json["percentage_difference"].is_null());
    }
}
