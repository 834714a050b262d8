//! Loading and preparation of sales data.

pub mod loader;
pub mod prepare;
pub mod record;

pub use loader::{load_csv, read_csv};
pub use prepare::{
    aggregate, filter_materials, group_series, parse_records, prepare, GroupedSeries,
    PreparationReport, PreparedData,
};
pub use record::{GroupKey, RawSalesRow, SalesRecord};
