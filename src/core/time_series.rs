//! Daily time series keyed by calendar date.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate, Weekday};

/// A univariate series of daily observations.
///
/// Dates are strictly increasing but need not be contiguous: a missing
/// calendar day is simply absent, never synthesised.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl DailySeries {
    /// Create a series from parallel date and value vectors.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }

        for i in 1..dates.len() {
            if dates[i] <= dates[i - 1] {
                return Err(ForecastError::DateError(
                    "dates must be strictly increasing".to_string(),
                ));
            }
        }

        Ok(Self { dates, values })
    }

    /// Create a series from `(date, value)` pairs, sorting them by date first.
    pub fn from_pairs(mut pairs: Vec<(NaiveDate, f64)>) -> Result<Self> {
        pairs.sort_by_key(|(date, _)| *date);
        let (dates, values) = pairs.into_iter().unzip();
        Self::new(dates, values)
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// First observed date.
    pub fn start(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Last observed date.
    pub fn end(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Number of calendar days between the first and last observation.
    pub fn span_days(&self) -> i64 {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => (end - start).num_days(),
            _ => 0,
        }
    }

    /// The most recent `n` observations.
    pub fn tail(&self, n: usize) -> Result<Self> {
        if n > self.len() {
            return Err(ForecastError::InsufficientData {
                needed: n,
                got: self.len(),
            });
        }
        let start = self.len() - n;
        Ok(Self {
            dates: self.dates[start..].to_vec(),
            values: self.values[start..].to_vec(),
        })
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Check that every value is finite.
    pub fn validate_finite(&self) -> Result<()> {
        if self.values.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(ForecastError::NonFiniteValues)
        }
    }
}

/// Days since the Unix epoch, as a float, for seasonal feature generation.
pub fn days_since_epoch(date: NaiveDate) -> f64 {
    // 719_163 is the day count of 1970-01-01 counted from 0001-01-01 (CE day 1).
    (date.num_days_from_ce() - 719_163) as f64
}

/// Whether a date falls on the given weekday.
pub fn is_weekday(date: NaiveDate, weekday: Weekday) -> bool {
    date.weekday() == weekday
}
