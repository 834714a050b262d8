//! Decomposable trend + seasonality forecasting model.

use super::params::{SeasonalityMode, TrialParameters};
use super::seasonality::{informative_terms, FourierTerm, Seasonality};
use super::trend::{place_changepoints, trend_at, trend_columns};
use crate::core::{days_since_epoch, DailySeries, Forecast};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::{interval_z, ridge_fit};
use chrono::{Duration, NaiveDate};

/// Observation noise variance assumed in scaled units when turning prior
/// scales into penalty weights.
const NOISE_VARIANCE: f64 = 0.01;

/// Default width of the uncertainty interval.
pub const DEFAULT_INTERVAL_WIDTH: f64 = 0.8;

/// Decomposable forecasting model.
///
/// The series is explained as a piecewise-linear trend plus a sum of Fourier
/// seasonalities, either added to the trend or scaling it:
///
/// * additive: `y(t) = g(t) + s(t)`
/// * multiplicative: `y(t) = g(t) * (1 + s(t))`
///
/// Coefficients are found by penalised least squares. Changepoint slopes are
/// penalised by `1 / changepoint_prior_scale²` and Fourier coefficients by
/// `1 / seasonality_prior_scale²`, so small prior scales give stiff fits.
#[derive(Debug, Clone)]
pub struct DecomposableModel {
    params: TrialParameters,
    extra_seasonalities: Vec<Seasonality>,
    interval_width: f64,
    state: Option<FittedState>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

#[derive(Debug, Clone)]
struct FittedState {
    history_dates: Vec<NaiveDate>,
    start: NaiveDate,
    span_days: f64,
    y_scale: f64,
    changepoints: Vec<f64>,
    trend_coeffs: Vec<f64>,
    terms: Vec<FourierTerm>,
    seasonal_coeffs: Vec<f64>,
    sigma: f64,
}

impl DecomposableModel {
    /// Create a model with the given hyperparameters.
    pub fn new(params: TrialParameters) -> Self {
        Self {
            params,
            extra_seasonalities: Vec::new(),
            interval_width: DEFAULT_INTERVAL_WIDTH,
            state: None,
            fitted: None,
            residuals: None,
        }
    }

    /// Add a custom seasonality on top of the built-in toggles.
    pub fn add_seasonality(mut self, seasonality: Seasonality) -> Self {
        self.extra_seasonalities.push(seasonality);
        self
    }

    /// Set the width of the uncertainty interval (0 < width < 1).
    pub fn with_interval_width(mut self, width: f64) -> Self {
        self.interval_width = width;
        self
    }

    pub fn params(&self) -> &TrialParameters {
        &self.params
    }

    /// All seasonal components the model will fit.
    pub fn seasonalities(&self) -> Vec<Seasonality> {
        let mut all = Vec::new();
        if self.params.yearly_seasonality {
            all.push(Seasonality::yearly());
        }
        if self.params.weekly_seasonality {
            all.push(Seasonality::weekly());
        }
        if self.params.daily_seasonality {
            all.push(Seasonality::daily());
        }
        all.extend(self.extra_seasonalities.iter().cloned());
        all
    }

    #[cfg(test)]
    fn changepoint_count(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.changepoints.len())
    }

    fn scaled_time(state: &FittedState, date: NaiveDate) -> f64 {
        (date - state.start).num_days() as f64 / state.span_days
    }

    /// Trend and seasonal value in scaled units for one date.
    fn components(&self, state: &FittedState, date: NaiveDate) -> (f64, f64) {
        let t = Self::scaled_time(state, date);
        let day = days_since_epoch(date);
        let trend = trend_at(t, &state.changepoints, &state.trend_coeffs);
        let seasonal: f64 = state
            .terms
            .iter()
            .zip(&state.seasonal_coeffs)
            .map(|(term, beta)| term.value(day) * beta)
            .sum();
        (trend, seasonal)
    }

    fn combine(&self, trend: f64, seasonal: f64) -> f64 {
        match self.params.seasonality_mode {
            SeasonalityMode::Additive => trend + seasonal,
            SeasonalityMode::Multiplicative => trend * (1.0 + seasonal),
        }
    }
}

impl Default for DecomposableModel {
    fn default() -> Self {
        Self::new(TrialParameters::default())
    }
}

impl Forecaster for DecomposableModel {
    fn fit(&mut self, series: &DailySeries) -> Result<()> {
        self.params.validate()?;
        interval_z(self.interval_width)?;

        if series.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if series.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: series.len(),
            });
        }
        series.validate_finite()?;

        let dates = series.dates();
        let values = series.values();
        let start = dates[0];
        let span_days = series.span_days() as f64;

        let y_scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };
        let y: Vec<f64> = values.iter().map(|v| v / y_scale).collect();

        let t: Vec<f64> = dates
            .iter()
            .map(|d| (*d - start).num_days() as f64 / span_days)
            .collect();
        let days: Vec<f64> = dates.iter().map(|d| days_since_epoch(*d)).collect();

        let changepoints = place_changepoints(
            &t,
            self.params.n_changepoints,
            self.params.changepoint_range,
        );
        let trend_cols = trend_columns(&t, &changepoints);
        let mut trend_penalties = vec![0.0, 0.0];
        trend_penalties.extend(
            std::iter::repeat(NOISE_VARIANCE / self.params.changepoint_prior_scale.powi(2))
                .take(changepoints.len()),
        );

        let (terms, seasonal_cols) = informative_terms(&self.seasonalities(), &days);
        let seasonal_penalty = NOISE_VARIANCE / self.params.seasonality_prior_scale.powi(2);

        let (trend_coeffs, seasonal_coeffs) = match self.params.seasonality_mode {
            SeasonalityMode::Additive => {
                let mut columns = trend_cols;
                columns.extend(seasonal_cols);
                let mut penalties = trend_penalties;
                penalties.extend(std::iter::repeat(seasonal_penalty).take(terms.len()));

                let fit = ridge_fit(&columns, &y, &penalties)?;
                let split = 2 + changepoints.len();
                let seasonal = fit.coefficients[split..].to_vec();
                let mut trend = fit.coefficients;
                trend.truncate(split);
                (trend, seasonal)
            }
            SeasonalityMode::Multiplicative => {
                let trend_fit = ridge_fit(&trend_cols, &y, &trend_penalties)?;
                let g = trend_fit.predict(&trend_cols)?;

                let seasonal = if terms.is_empty() {
                    Vec::new()
                } else {
                    let scaled_cols: Vec<Vec<f64>> = seasonal_cols
                        .iter()
                        .map(|col| col.iter().zip(&g).map(|(x, gi)| x * gi).collect())
                        .collect();
                    let remainder: Vec<f64> = y.iter().zip(&g).map(|(yi, gi)| yi - gi).collect();
                    let penalties = vec![seasonal_penalty; terms.len()];
                    ridge_fit(&scaled_cols, &remainder, &penalties)?.coefficients
                };
                (trend_fit.coefficients, seasonal)
            }
        };

        let mut state = FittedState {
            history_dates: dates.to_vec(),
            start,
            span_days,
            y_scale,
            changepoints,
            trend_coeffs,
            terms,
            seasonal_coeffs,
            sigma: 0.0,
        };

        let fitted: Vec<f64> = dates
            .iter()
            .map(|d| {
                let (trend, seasonal) = self.components(&state, *d);
                self.combine(trend, seasonal) * y_scale
            })
            .collect();

        if fitted.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ComputationError(
                "fit produced non-finite predictions".into(),
            ));
        }

        let residuals: Vec<f64> = values.iter().zip(&fitted).map(|(a, f)| a - f).collect();
        state.sigma =
            (residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64).sqrt();

        self.state = Some(state);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let state = self.state.as_ref().ok_or(ForecastError::FitRequired)?;
        let z = interval_z(self.interval_width)?;

        let history_len = state.history_dates.len();
        let last = state.history_dates[history_len - 1];

        let mut dates = state.history_dates.clone();
        dates.extend((1..=horizon as i64).map(|h| last + Duration::days(h)));

        let mut yhat = Vec::with_capacity(dates.len());
        let mut lower = Vec::with_capacity(dates.len());
        let mut upper = Vec::with_capacity(dates.len());
        let mut trend = Vec::with_capacity(dates.len());

        for date in &dates {
            let (g, s) = self.components(state, *date);
            let value = self.combine(g, s) * state.y_scale;
            let steps_ahead = (*date - last).num_days().max(0) as f64;
            let sd = state.sigma * (1.0 + steps_ahead / history_len as f64).sqrt();

            yhat.push(value);
            lower.push(value - z * sd);
            upper.push(value + z * sd);
            trend.push(g * state.y_scale);
        }

        Forecast::new(dates, yhat, lower, upper, trend, history_len)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "Decomposable"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::mae;
    use approx::assert_relative_eq;
    use chrono::{Datelike, Weekday};

    fn make_dates(n: usize) -> Vec<NaiveDate> {
        let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    fn make_weekly_series(n: usize) -> DailySeries {
        let dates = make_dates(n);
        let values = dates
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let weekday_effect = match d.weekday() {
                    Weekday::Sat => -20.0,
                    Weekday::Sun => -30.0,
                    _ => 5.0,
                };
                100.0 + 0.2 * i as f64 + weekday_effect
            })
            .collect();
        DailySeries::new(dates, values).unwrap()
    }

    fn weekly_params(mode: SeasonalityMode) -> TrialParameters {
        TrialParameters {
            seasonality_mode: mode,
            yearly_seasonality: false,
            weekly_seasonality: true,
            daily_seasonality: false,
            ..Default::default()
        }
    }

    #[test]
    fn constant_series_is_recovered() {
        let series = DailySeries::new(make_dates(90), vec![50.0; 90]).unwrap();
        let mut model = DecomposableModel::default().add_seasonality(Seasonality::monthly(5));
        model.fit(&series).unwrap();

        let fitted = model.fitted_values().unwrap();
        assert!(mae(series.values(), fitted) < 0.5);

        let forecast = model.predict(30).unwrap();
        for v in forecast.future() {
            assert_relative_eq!(*v, 50.0, epsilon = 1.0);
        }
    }

    #[test]
    fn additive_model_captures_weekly_pattern() {
        let series = make_weekly_series(140);
        let mut model = DecomposableModel::new(weekly_params(SeasonalityMode::Additive));
        model.fit(&series).unwrap();

        let fitted = model.fitted_values().unwrap();
        assert!(
            mae(series.values(), fitted) < 3.0,
            "in-sample MAE too large: {}",
            mae(series.values(), fitted)
        );
    }

    #[test]
    fn multiplicative_model_captures_weekly_pattern() {
        let series = make_weekly_series(140);
        let mut model = DecomposableModel::new(weekly_params(SeasonalityMode::Multiplicative));
        model.fit(&series).unwrap();

        let fitted = model.fitted_values().unwrap();
        assert!(mae(series.values(), fitted) < 5.0);
    }

    #[test]
    fn trend_is_extrapolated() {
        let dates = make_dates(60);
        let values: Vec<f64> = (0..60).map(|i| 10.0 + 2.0 * i as f64).collect();
        let series = DailySeries::new(dates, values).unwrap();

        let params = TrialParameters {
            yearly_seasonality: false,
            weekly_seasonality: false,
            ..Default::default()
        };
        let mut model = DecomposableModel::new(params);
        model.fit(&series).unwrap();

        let forecast = model.predict(10).unwrap();
        let future = forecast.future();
        assert_relative_eq!(future[0], 130.0, epsilon = 2.0);
        assert!(future[9] > future[0]);
    }

    #[test]
    fn forecast_frame_covers_history_and_horizon() {
        let series = make_weekly_series(50);
        let mut model = DecomposableModel::new(weekly_params(SeasonalityMode::Additive));
        model.fit(&series).unwrap();

        let forecast = model.predict(30).unwrap();
        assert_eq!(forecast.len(), 80);
        assert_eq!(forecast.history_len(), 50);
        assert_eq!(forecast.horizon(), 30);
        assert_eq!(&forecast.dates()[..50], series.dates());
        assert_eq!(
            forecast.future_dates()[0],
            series.end().unwrap() + Duration::days(1)
        );

        for i in 0..forecast.len() {
            assert!(forecast.lower()[i] <= forecast.yhat()[i]);
            assert!(forecast.upper()[i] >= forecast.yhat()[i]);
        }
    }

    #[test]
    fn interval_widens_with_horizon() {
        let series = make_weekly_series(70);
        let mut model = DecomposableModel::new(TrialParameters {
            weekly_seasonality: false,
            yearly_seasonality: false,
            ..Default::default()
        });
        model.fit(&series).unwrap();

        let forecast = model.predict(20).unwrap();
        let width = |i: usize| forecast.upper()[i] - forecast.lower()[i];
        assert!(width(89) > width(70));
    }

    #[test]
    fn gaps_in_history_are_supported() {
        let dates: Vec<NaiveDate> = make_dates(100)
            .into_iter()
            .filter(|d| d.weekday() != Weekday::Sun)
            .collect();
        let n = dates.len();
        let series = DailySeries::new(dates, vec![20.0; n]).unwrap();

        let mut model = DecomposableModel::new(weekly_params(SeasonalityMode::Additive));
        model.fit(&series).unwrap();
        assert_eq!(model.fitted_values().unwrap().len(), n);
    }

    #[test]
    fn fitted_and_residuals() {
        let series = make_weekly_series(40);
        let mut model = DecomposableModel::default();
        assert!(!model.is_fitted());
        model.fit(&series).unwrap();

        assert!(model.is_fitted());
        let fitted = model.fitted_values().unwrap();
        let residuals = model.residuals().unwrap();
        assert_eq!(fitted.len(), 40);
        for i in 0..40 {
            assert_relative_eq!(
                residuals[i],
                series.values()[i] - fitted[i],
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn requires_fit() {
        let model = DecomposableModel::default();
        assert!(matches!(model.predict(5), Err(ForecastError::FitRequired)));
    }

    #[test]
    fn insufficient_data() {
        let series = DailySeries::new(make_dates(1), vec![3.0]).unwrap();
        let mut model = DecomposableModel::default();
        assert!(matches!(
            model.fit(&series),
            Err(ForecastError::InsufficientData { needed: 2, got: 1 })
        ));

        let empty = DailySeries::new(vec![], vec![]).unwrap();
        assert!(matches!(model.fit(&empty), Err(ForecastError::EmptyData)));
    }

    #[test]
    fn rejects_non_finite_values() {
        let series = DailySeries::new(make_dates(3), vec![1.0, f64::INFINITY, 2.0]).unwrap();
        let mut model = DecomposableModel::default();
        assert_eq!(model.fit(&series), Err(ForecastError::NonFiniteValues));
    }

    #[test]
    fn rejects_invalid_parameters() {
        let series = make_weekly_series(20);
        let mut model = DecomposableModel::new(TrialParameters {
            changepoint_prior_scale: -1.0,
            ..Default::default()
        });
        assert!(matches!(
            model.fit(&series),
            Err(ForecastError::InvalidParameter(_))
        ));

        let mut model = DecomposableModel::default().with_interval_width(1.5);
        assert!(model.fit(&series).is_err());
    }

    #[test]
    fn zero_horizon_returns_history_only() {
        let series = make_weekly_series(30);
        let mut model = DecomposableModel::default();
        model.fit(&series).unwrap();
        let forecast = model.predict(0).unwrap();
        assert_eq!(forecast.len(), 30);
        assert_eq!(forecast.horizon(), 0);
    }

    #[test]
    fn changepoints_capped_for_short_series() {
        let series = make_weekly_series(12);
        let mut model = DecomposableModel::new(TrialParameters {
            n_changepoints: 40,
            changepoint_range: 1.0,
            ..Default::default()
        });
        model.fit(&series).unwrap();
        assert_eq!(model.changepoint_count(), Some(11));
    }

    #[test]
    fn name() {
        assert_eq!(DecomposableModel::default().name(), "Decomposable");
    }
}
