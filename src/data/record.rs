//! Sales records and group keys.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One fully-populated sales observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub plant: u32,
    pub material: u32,
    pub quantity: f64,
}

impl SalesRecord {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.plant, self.material)
    }
}

/// A row as read from the input, before validation. Empty fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSalesRow {
    pub date: Option<String>,
    pub plant: Option<String>,
    pub material: Option<String>,
    pub quantity: Option<String>,
}

impl RawSalesRow {
    pub fn new(date: &str, plant: &str, material: &str, quantity: &str) -> Self {
        let field = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        Self {
            date: field(date),
            plant: field(plant),
            material: field(material),
            quantity: field(quantity),
        }
    }

    /// Convert to a record; `None` if any field is missing or unparseable.
    pub fn parse(&self, date_format: &str) -> Option<SalesRecord> {
        Some(SalesRecord {
            date: parse_date(self.date.as_deref()?, date_format)?,
            plant: parse_id(self.plant.as_deref()?)?,
            material: parse_id(self.material.as_deref()?)?,
            quantity: parse_quantity(self.quantity.as_deref()?)?,
        })
    }
}

/// Parse a calendar date with the configured format, falling back to
/// `YYYY-MM-DD HH:MM:SS` and RFC 3339 date-times (time of day discarded).
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, format)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Parse a plant or material identifier. Integral floats such as `101.0`
/// are accepted since spreadsheet exports often write ids that way.
pub fn parse_id(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u32>() {
        return Some(id);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

/// Parse a quantity; NaN and infinities count as missing.
pub fn parse_quantity(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Identifies one (plant, material) series. Displays as `"{plant}_{material}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey {
    pub plant: u32,
    pub material: u32,
}

impl GroupKey {
    pub fn new(plant: u32, material: u32) -> Self {
        Self { plant, material }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.plant, self.material)
    }
}

impl FromStr for GroupKey {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ForecastError::InvalidGroupKey(s.to_string());
        let (plant, material) = s.trim().split_once('_').ok_or_else(invalid)?;
        Ok(Self {
            plant: plant.parse().map_err(|_| invalid())?,
            material: material.parse().map_err(|_| invalid())?,
        })
    }
}
