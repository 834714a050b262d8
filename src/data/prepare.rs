//! Filtering, cleaning and aggregation of sales records into grouped series.

use super::record::{GroupKey, RawSalesRow, SalesRecord};
use crate::core::DailySeries;
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// One (plant, material) daily quantity series.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSeries {
    pub key: GroupKey,
    pub series: DailySeries,
}

impl GroupedSeries {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Row counts from each preparation stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreparationReport {
    pub rows_read: usize,
    /// Rows with a missing or unparseable field.
    pub incomplete_dropped: usize,
    /// Complete rows whose material is not on the allow-list.
    pub filtered_out: usize,
    pub records_kept: usize,
    /// Distinct (date, plant, material) triples after summing.
    pub aggregated_rows: usize,
    pub groups: usize,
}

/// Grouped series ready for forecasting, plus the preparation report.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub groups: BTreeMap<GroupKey, GroupedSeries>,
    pub report: PreparationReport,
}

/// Keep fully-populated rows; returns the records and the number dropped.
pub fn parse_records(rows: &[RawSalesRow], date_format: &str) -> (Vec<SalesRecord>, usize) {
    let records: Vec<SalesRecord> = rows
        .iter()
        .filter_map(|row| row.parse(date_format))
        .collect();
    let dropped = rows.len() - records.len();
    (records, dropped)
}

/// Keep records whose material is on the allow-list.
pub fn filter_materials(records: Vec<SalesRecord>, materials: &[u32]) -> Vec<SalesRecord> {
    records
        .into_iter()
        .filter(|r| materials.contains(&r.material))
        .collect()
}

/// Sum quantity per exact (date, plant, material) triple.
///
/// The output is ordered by plant, material, then date. Aggregating an
/// already aggregated set returns it unchanged.
pub fn aggregate(records: &[SalesRecord]) -> Vec<SalesRecord> {
    let mut sums: BTreeMap<(u32, u32, NaiveDate), f64> = BTreeMap::new();
    for record in records {
        *sums
            .entry((record.plant, record.material, record.date))
            .or_insert(0.0) += record.quantity;
    }

    sums.into_iter()
        .map(|((plant, material, date), quantity)| SalesRecord {
            date,
            plant,
            material,
            quantity,
        })
        .collect()
}

/// Split aggregated records into one series per (plant, material).
pub fn group_series(aggregated: &[SalesRecord]) -> Result<BTreeMap<GroupKey, GroupedSeries>> {
    let mut pairs: BTreeMap<GroupKey, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for record in aggregated {
        pairs
            .entry(record.key())
            .or_default()
            .push((record.date, record.quantity));
    }

    pairs
        .into_iter()
        .map(|(key, pairs)| {
            let series = DailySeries::from_pairs(pairs)?;
            Ok((key, GroupedSeries { key, series }))
        })
        .collect()
}

/// Run the whole preparation: drop incomplete rows, filter materials,
/// aggregate and group.
pub fn prepare(rows: &[RawSalesRow], date_format: &str, materials: &[u32]) -> Result<PreparedData> {
    let (records, incomplete_dropped) = parse_records(rows, date_format);
    if incomplete_dropped > 0 {
        warn!(
            dropped = incomplete_dropped,
            "dropped rows with missing or unparseable fields"
        );
    }

    let complete = records.len();
    let kept = filter_materials(records, materials);
    let aggregated = aggregate(&kept);
    let groups = group_series(&aggregated)?;

    let report = PreparationReport {
        rows_read: rows.len(),
        incomplete_dropped,
        filtered_out: complete - kept.len(),
        records_kept: kept.len(),
        aggregated_rows: aggregated.len(),
        groups: groups.len(),
    };
    info!(
        rows_read = report.rows_read,
        records_kept = report.records_kept,
        aggregated_rows = report.aggregated_rows,
        groups = report.groups,
        "prepared sales data"
    );

    Ok(PreparedData { groups, report })
}
