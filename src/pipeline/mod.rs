//! Per-group forecasting pipeline: tune, refit, adjust to the operating
//! calendar, evaluate, and cache.

pub mod cache;
pub mod calendar;
pub mod evaluate;
pub mod group;
pub mod orchestrator;
pub mod result;

pub use cache::{CacheState, GroupFailure, GroupOutcome, Lookup, ResultsCache, TrainedResults};
pub use calendar::OperatingCalendar;
pub use evaluate::{comparison_table, evaluate_trailing, ComparisonRow};
pub use group::{forecast_group, GroupSettings};
pub use orchestrator::{ForecastPipeline, TrainOutcome};
pub use result::{ForecastFigure, ForecastResult};
