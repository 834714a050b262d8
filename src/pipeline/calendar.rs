//! Plant operating calendars applied to forecasts.

use crate::core::Forecast;
use crate::policy::closed_days;
use chrono::{Datelike, NaiveDate, Weekday};

/// Weekdays on which a plant does not operate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingCalendar {
    closed: &'static [Weekday],
}

impl OperatingCalendar {
    /// Plant 101 is closed Saturday and Sunday; every other plant on Sunday.
    pub fn for_plant(plant: u32) -> Self {
        Self {
            closed: closed_days(plant),
        }
    }

    pub fn closed_days(&self) -> &'static [Weekday] {
        self.closed
    }

    pub fn is_open(&self, date: NaiveDate) -> bool {
        !self.closed.contains(&date.weekday())
    }

    /// Zero every future row on a closed day, then clamp negatives to zero
    /// across the whole frame.
    ///
    /// History rows keep the model's in-sample values so they stay
    /// comparable with the observed quantities.
    pub fn apply(&self, forecast: &mut Forecast) {
        let history = forecast.history_len();
        let closed_rows: Vec<usize> = forecast
            .dates()
            .iter()
            .enumerate()
            .skip(history)
            .filter(|(_, d)| !self.is_open(**d))
            .map(|(i, _)| i)
            .collect();
        for i in closed_rows {
            forecast.zero_row(i);
        }
        forecast.clamp_non_negative();
    }
}
