//! Tabular views built with comfy-table.

use crate::models::TrialParameters;
use crate::pipeline::{ComparisonRow, GroupOutcome};
use crate::tuning::{TrialRecord, TrialState};
use comfy_table::{Cell, Color, Table};
use std::collections::BTreeMap;

fn number(value: f64) -> String {
    format!("{value:.2}")
}

/// One line per trained group with its evaluation metrics or error.
pub fn groups_table(outcomes: &BTreeMap<String, GroupOutcome>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Group", "Status", "RMSE", "MAE", "Detail"]);

    for (index, (key, outcome)) in outcomes.iter().enumerate() {
        let row = match outcome {
            Ok(result) => vec![
                Cell::new(index + 1),
                Cell::new(key),
                Cell::new("ok").fg(Color::Green),
                Cell::new(number(result.rmse)),
                Cell::new(number(result.mae)),
                Cell::new(format!("{} trials", result.trials.len())),
            ],
            Err(failure) => vec![
                Cell::new(index + 1),
                Cell::new(key),
                Cell::new("failed").fg(Color::Red),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new(failure.error.to_string()),
            ],
        };
        table.add_row(row);
    }
    table
}

/// Actual against predicted for every observation of a group.
pub fn comparison_rows_table(rows: &[ComparisonRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Date",
        "Plant",
        "Material",
        "Actual",
        "Predicted",
        "Difference",
        "Difference %",
    ]);

    for row in rows {
        let pct = match row.percentage_difference {
            Some(p) => Cell::new(format!("{p:.1}%")),
            None => Cell::new("n/a").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(row.date),
            Cell::new(row.plant),
            Cell::new(row.material),
            Cell::new(number(row.actual)),
            Cell::new(number(row.predicted)),
            Cell::new(number(row.difference)),
            pct,
        ]);
    }
    table
}

/// The winning hyperparameters, one per line.
pub fn params_table(params: &TrialParameters) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Parameter", "Value"]);
    let rows: [(&str, String); 9] = [
        ("seasonality_mode", params.seasonality_mode.to_string()),
        (
            "changepoint_prior_scale",
            format!("{:.4}", params.changepoint_prior_scale),
        ),
        (
            "seasonality_prior_scale",
            format!("{:.4}", params.seasonality_prior_scale),
        ),
        (
            "fourier_order_monthly",
            params.fourier_order_monthly.to_string(),
        ),
        ("yearly_seasonality", params.yearly_seasonality.to_string()),
        ("weekly_seasonality", params.weekly_seasonality.to_string()),
        ("daily_seasonality", params.daily_seasonality.to_string()),
        ("n_changepoints", params.n_changepoints.to_string()),
        (
            "changepoint_range",
            format!("{:.3}", params.changepoint_range),
        ),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    table
}

/// Search history. The best completed trial is highlighted.
pub fn trials_table(trials: &[TrialRecord]) -> Table {
    let best = trials
        .iter()
        .filter_map(|t| t.value.map(|v| (t.number, v)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(n, _)| n);

    let mut table = Table::new();
    table.set_header(vec!["Trial", "State", "MAE", "Parameters"]);
    for trial in trials {
        let params = trial
            .params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        let (state, value) = match trial.state {
            TrialState::Complete => (
                Cell::new("complete"),
                Cell::new(trial.value.map(number).unwrap_or_default()),
            ),
            TrialState::Failed => (
                Cell::new("failed").fg(Color::Red),
                Cell::new(trial.error.clone().unwrap_or_default()),
            ),
        };
        let number_cell = if Some(trial.number) == best {
            Cell::new(trial.number).fg(Color::Green)
        } else {
            Cell::new(trial.number)
        };
        table.add_row(vec![number_cell, state, value, Cell::new(params)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GroupKey;
    use crate::error::ForecastError;
    use crate::pipeline::GroupFailure;
    use crate::tuning::ParamValue;
    use chrono::NaiveDate;

    #[test]
    fn failed_groups_show_their_error() {
        let mut outcomes: BTreeMap<String, GroupOutcome> = BTreeMap::new();
        outcomes.insert(
            "102_101".to_string(),
            Err(GroupFailure {
                key: GroupKey::new(102, 101),
                error: ForecastError::InsufficientData { needed: 30, got: 4 },
            }),
        );
        let rendered = groups_table(&outcomes).to_string();
        assert!(rendered.contains("102_101"));
        assert!(rendered.contains("failed"));
        assert!(rendered.contains("need at least 30, got 4"));
    }

    #[test]
    fn missing_percentage_renders_as_na() {
        let rows = vec![ComparisonRow {
            date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            plant: 101,
            material: 102,
            actual: 0.0,
            predicted: 1.5,
            difference: -1.5,
            percentage_difference: None,
        }];
        let rendered = comparison_rows_table(&rows).to_string();
        assert!(rendered.contains("2024-03-03"));
        assert!(rendered.contains("n/a"));
        assert!(rendered.contains("-1.50"));
    }

    #[test]
    fn params_table_lists_every_parameter() {
        let rendered = params_table(&TrialParameters::default()).to_string();
        for name in [
            "seasonality_mode",
            "changepoint_prior_scale",
            "fourier_order_monthly",
            "changepoint_range",
        ] {
            assert!(rendered.contains(name), "missing {name}");
        }
    }

    #[test]
    fn trials_table_includes_failures() {
        let mut params = BTreeMap::new();
        params.insert("n_changepoints".to_string(), ParamValue::Int(12));
        let trials = vec![
            TrialRecord {
                number: 0,
                params: params.clone(),
                state: TrialState::Complete,
                value: Some(3.25),
                error: None,
            },
            TrialRecord {
                number: 1,
                params,
                state: TrialState::Failed,
                value: None,
                error: Some("singular".to_string()),
            },
        ];
        let rendered = trials_table(&trials).to_string();
        assert!(rendered.contains("3.25"));
        assert!(rendered.contains("singular"));
        assert!(rendered.contains("n_changepoints=12"));
    }
}
