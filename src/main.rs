//! # plant-forecast
//!
//! Loads a sales CSV and opens an interactive forecasting session.

use anyhow::{bail, Context};
use clap::Parser;
use plant_forecast::config::AppConfig;
use plant_forecast::data::{load_csv, prepare};
use plant_forecast::pipeline::{ForecastPipeline, GroupSettings};
use plant_forecast::policy::SELECTED_MATERIALS;
use plant_forecast::session::{Command, Session};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "plant-forecast")]
#[command(about = "Per-plant, per-material daily sales forecasting", long_about = None)]
struct Cli {
    /// Sales CSV (overrides the configured input)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Configuration file (default: ./plant-forecast.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base seed for the hyperparameter search
    #[arg(short, long)]
    seed: Option<u64>,

    /// Train every group before the first prompt
    #[arg(long)]
    train: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plant_forecast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(input) = cli.input {
        config.input = Some(input);
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let Some(input) = config.input.clone() else {
        bail!("no input file; pass --input or set `input` in the configuration");
    };

    info!(path = %input.display(), "loading sales data");
    let rows = load_csv(&input, &config.columns)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let prepared = prepare(&rows, &config.date_format, &SELECTED_MATERIALS)?;
    info!(
        rows = prepared.report.rows_read,
        dropped = prepared.report.incomplete_dropped,
        groups = prepared.report.groups,
        "data prepared"
    );

    let pipeline = ForecastPipeline::new(GroupSettings::from_policy(
        config.seed,
        config.interval_width,
    ));
    let mut session = Session::new(prepared.groups, pipeline);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.train {
        session.execute(Command::Train, &mut out)?;
    }
    let stdin = io::stdin();
    session.run(stdin.lock(), &mut out)?;
    Ok(())
}
