//! Fixed operating policy.
//!
//! These values encode business rules and are not exposed as configuration.

use chrono::Weekday;

/// Materials retained from the sales history.
pub const SELECTED_MATERIALS: [u32; 2] = [101, 102];

/// Number of hyperparameter trials per group.
pub const TRIAL_BUDGET: usize = 30;

/// Days forecast past the last observation.
pub const FORECAST_HORIZON: usize = 30;

/// Trailing observations used for evaluation.
pub const EVALUATION_WINDOW: usize = 30;

/// Plant that is closed on weekends; every other plant closes on Sunday only.
pub const WEEKEND_CLOSED_PLANT: u32 = 101;

/// Days on which `plant` does not operate.
pub fn closed_days(plant: u32) -> &'static [Weekday] {
    if plant == WEEKEND_CLOSED_PLANT {
        &[Weekday::Sat, Weekday::Sun]
    } else {
        &[Weekday::Sun]
    }
}
