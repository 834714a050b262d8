//! CSV loading of raw sales rows.

use super::record::RawSalesRow;
use crate::config::ColumnConfig;
use crate::error::{ForecastError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Load raw rows from a headered CSV file.
pub fn load_csv(path: &Path, columns: &ColumnConfig) -> Result<Vec<RawSalesRow>> {
    let file = File::open(path)
        .map_err(|e| ForecastError::Io(format!("failed to open {}: {}", path.display(), e)))?;
    let rows = read_csv(BufReader::new(file), columns)?;
    info!(path = %path.display(), rows = rows.len(), "loaded sales file");
    Ok(rows)
}

/// Read raw rows from any CSV source.
///
/// Only the four configured columns are read; other columns are ignored.
/// Rows shorter than the header yield missing fields rather than errors.
pub fn read_csv<R: Read>(reader: R, columns: &ColumnConfig) -> Result<Vec<RawSalesRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ForecastError::Csv(format!("column '{}' not found", name)))
    };

    let date_idx = position(&columns.date)?;
    let plant_idx = position(&columns.plant)?;
    let material_idx = position(&columns.material)?;
    let quantity_idx = position(&columns.quantity)?;
    debug!(date_idx, plant_idx, material_idx, quantity_idx, "resolved columns");

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let field = |idx: usize| record.get(idx).unwrap_or("");
        rows.push(RawSalesRow::new(
            field(date_idx),
            field(plant_idx),
            field(material_idx),
            field(quantity_idx),
        ));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Document Date,Plant,Material,Quantity,Customer
2024-01-01,101,101,5,A
2024-01-01,101,101,3,B
2024-01-02,,101,4,C
2024-01-03,102,102,7
";

    #[test]
    fn reads_configured_columns() {
        let rows = read_csv(SAMPLE.as_bytes(), &ColumnConfig::default()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], RawSalesRow::new("2024-01-01", "101", "101", "5"));
        assert_eq!(rows[2].plant, None);
        assert_eq!(rows[3].quantity.as_deref(), Some("7"));
    }

    #[test]
    fn missing_column_is_reported() {
        let columns = ColumnConfig {
            quantity: "Qty".to_string(),
            ..Default::default()
        };
        let err = read_csv(SAMPLE.as_bytes(), &columns).unwrap_err();
        assert_eq!(err, ForecastError::Csv("column 'Qty' not found".to_string()));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let rows = load_csv(file.path(), &ColumnConfig::default()).unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_csv(Path::new("/no/such/sales.csv"), &ColumnConfig::default()).unwrap_err();
        assert!(matches!(err, ForecastError::Io(_)));
    }
}
