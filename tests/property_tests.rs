//! Property-based tests for preparation, calendar rules and metrics.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use plant_forecast::core::Forecast;
use plant_forecast::data::{aggregate, parse_records, prepare, RawSalesRow};
use plant_forecast::pipeline::OperatingCalendar;
use plant_forecast::policy::SELECTED_MATERIALS;
use plant_forecast::utils::percentage_difference;
use proptest::prelude::*;

const FORMAT: &str = "%Y-%m-%d";

/// A row where each field is independently present or missing.
fn row_strategy() -> impl Strategy<Value = RawSalesRow> {
    (
        prop::option::weighted(0.9, 0..60i64),
        prop::option::weighted(0.9, prop::sample::select(vec![101u32, 102, 103])),
        prop::option::weighted(0.9, prop::sample::select(vec![100u32, 101, 102, 104])),
        prop::option::weighted(0.9, 0.0..500.0_f64),
    )
        .prop_map(|(day, plant, material, quantity)| {
            let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            RawSalesRow {
                date: day.map(|d| (base + Duration::days(d)).to_string()),
                plant: plant.map(|p| p.to_string()),
                material: material.map(|m| m.to_string()),
                quantity: quantity.map(|q| q.to_string()),
            }
        })
}

fn is_complete(row: &RawSalesRow) -> bool {
    row.date.is_some() && row.plant.is_some() && row.material.is_some() && row.quantity.is_some()
}

fn forecast_strategy() -> impl Strategy<Value = (NaiveDate, Vec<f64>)> {
    (0..366i64, prop::collection::vec(-100.0..100.0_f64, 1..60)).prop_map(|(offset, values)| {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset),
            values,
        )
    })
}

fn make_forecast(start: NaiveDate, values: &[f64]) -> Forecast {
    let dates = (0..values.len())
        .map(|i| start + Duration::days(i as i64))
        .collect();
    let lower = values.iter().map(|v| v - 5.0).collect();
    let upper = values.iter().map(|v| v + 5.0).collect();
    Forecast::new(
        dates,
        values.to_vec(),
        lower,
        upper,
        values.to_vec(),
        values.len() / 2,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn incomplete_rows_are_dropped(rows in prop::collection::vec(row_strategy(), 0..80)) {
        let complete = rows.iter().filter(|r| is_complete(r)).count();
        let (records, dropped) = parse_records(&rows, FORMAT);

        prop_assert_eq!(records.len(), complete);
        prop_assert_eq!(dropped, rows.len() - complete);
    }

    #[test]
    fn prepared_groups_only_hold_selected_materials(
        rows in prop::collection::vec(row_strategy(), 0..80)
    ) {
        let prepared = prepare(&rows, FORMAT, &SELECTED_MATERIALS).unwrap();
        let report = &prepared.report;

        prop_assert_eq!(
            report.incomplete_dropped + report.filtered_out + report.records_kept,
            report.rows_read
        );
        prop_assert!(report.aggregated_rows <= report.records_kept);
        for key in prepared.groups.keys() {
            prop_assert!(SELECTED_MATERIALS.contains(&key.material));
        }

        let total: usize = prepared.groups.values().map(|g| g.len()).sum();
        prop_assert_eq!(total, report.aggregated_rows);
    }

    #[test]
    fn aggregation_is_idempotent(rows in prop::collection::vec(row_strategy(), 0..80)) {
        let (records, _) = parse_records(&rows, FORMAT);
        let once = aggregate(&records);
        let twice = aggregate(&once);
        prop_assert_eq!(&once, &twice);

        let before: f64 = records.iter().map(|r| r.quantity).sum();
        let after: f64 = once.iter().map(|r| r.quantity).sum();
        prop_assert!((before - after).abs() < 1e-6 * before.max(1.0));
    }

    #[test]
    fn weekend_plant_future_is_zero_on_saturday_and_sunday((start, values) in forecast_strategy()) {
        let mut forecast = make_forecast(start, &values);
        OperatingCalendar::for_plant(101).apply(&mut forecast);

        for (i, date) in forecast.dates().iter().enumerate() {
            let yhat = forecast.yhat()[i];
            prop_assert!(yhat >= 0.0);
            prop_assert!(forecast.lower()[i] >= 0.0);
            if i >= forecast.history_len() && matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                prop_assert_eq!(yhat, 0.0);
            } else {
                prop_assert_eq!(yhat, values[i].max(0.0));
            }
        }
    }

    #[test]
    fn other_plants_future_is_zero_on_sunday_only(
        (start, values) in forecast_strategy(),
        plant in prop::sample::select(vec![102u32, 103, 200]),
    ) {
        let mut forecast = make_forecast(start, &values);
        OperatingCalendar::for_plant(plant).apply(&mut forecast);

        for (i, date) in forecast.dates().iter().enumerate() {
            let yhat = forecast.yhat()[i];
            prop_assert!(yhat >= 0.0);
            if i >= forecast.history_len() && date.weekday() == Weekday::Sun {
                prop_assert_eq!(yhat, 0.0);
            } else {
                prop_assert_eq!(yhat, values[i].max(0.0));
            }
        }
    }

    #[test]
    fn percentage_difference_is_finite_or_none(
        actual in prop_oneof![Just(0.0_f64), -1e6..1e6_f64],
        predicted in -1e6..1e6_f64,
    ) {
        match percentage_difference(actual, predicted) {
            None => prop_assert!(
                actual == 0.0 || !((actual - predicted) / actual * 100.0).is_finite()
            ),
            Some(p) => {
                prop_assert!(p.is_finite());
                prop_assert!(actual != 0.0);
            }
        }
    }
}
