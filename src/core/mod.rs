//! Core data structures for daily sales forecasting.

mod forecast;
mod time_series;

pub use forecast::Forecast;
pub use time_series::{days_since_epoch, is_weekday, DailySeries};
