//! Application configuration.
//!
//! Values come from an optional `plant-forecast.toml`, then from
//! `PLANT_FORECAST__*` environment variables (`__` separates nesting, e.g.
//! `PLANT_FORECAST__COLUMNS__DATE`). Command-line flags override both.
//!
//! Policy constants (material allow-list, trial budget, horizon, evaluation
//! window) are deliberately not configurable; see [`crate::policy`].

use crate::error::{ForecastError, Result};
use crate::models::decomposable::DEFAULT_INTERVAL_WIDTH;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Sales CSV to load.
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub columns: ColumnConfig,
    /// `chrono` format of the date column.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Base seed for the hyperparameter sampler.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Width of the forecast uncertainty interval.
    #[serde(default = "default_interval_width")]
    pub interval_width: f64,
}

/// Header names of the input columns.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ColumnConfig {
    #[serde(default = "default_date_column")]
    pub date: String,
    #[serde(default = "default_plant_column")]
    pub plant: String,
    #[serde(default = "default_material_column")]
    pub material: String,
    #[serde(default = "default_quantity_column")]
    pub quantity: String,
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_seed() -> u64 {
    42
}

fn default_interval_width() -> f64 {
    DEFAULT_INTERVAL_WIDTH
}

fn default_date_column() -> String {
    "Document Date".to_string()
}

fn default_plant_column() -> String {
    "Plant".to_string()
}

fn default_material_column() -> String {
    "Material".to_string()
}

fn default_quantity_column() -> String {
    "Quantity".to_string()
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            date: default_date_column(),
            plant: default_plant_column(),
            material: default_material_column(),
            quantity: default_quantity_column(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: None,
            columns: ColumnConfig::default(),
            date_format: default_date_format(),
            seed: default_seed(),
            interval_width: default_interval_width(),
        }
    }
}

impl AppConfig {
    /// Load from `plant-forecast.toml` in the working directory (if present)
    /// and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load from an explicit file (which must exist) or the default location.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("plant-forecast").required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("PLANT_FORECAST").separator("__"))
            .build()
            .map_err(|e| ForecastError::InvalidParameter(format!("configuration: {e}")))?;

        let app_config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| ForecastError::InvalidParameter(format!("configuration: {e}")))?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval_width must be in (0, 1), got {}",
                self.interval_width
            )));
        }
        if self.date_format.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "date_format must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
