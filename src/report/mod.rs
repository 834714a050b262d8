//! Terminal rendering of forecast results.

pub mod chart;
pub mod table;

pub use chart::render_chart;
pub use table::{comparison_rows_table, groups_table, params_table, trials_table};
