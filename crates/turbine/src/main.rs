use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use turbine_core::config::{FillScope, PipelineConfig};
use turbine_core::pipeline::{run_pipeline_with, PipelineEvent};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Clean, summarize and flag anomalies in wind turbine measurements",
    long_about = None
)]
struct Cli {
    /// TOML file with pipeline settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Glob pattern selecting the input CSV files
    #[arg(long)]
    input_pattern: Option<String>,
    /// Directory the output CSV files are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Forward-fill over the whole dataset or within each turbine
    #[arg(long, value_parser = parse_fill_scope)]
    fill_scope: Option<FillScope>,
}

fn parse_fill_scope(value: &str) -> Result<FillScope, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let report = run_pipeline_with(&config, |event| match event {
        PipelineEvent::FileSkipped(failure) => eprintln!("{failure}"),
        PipelineEvent::ArtifactWritten(artifact) => println!("{artifact}"),
    })
    .with_context(|| format!("pipeline run over '{}' failed", config.input_pattern))?;

    info!(
        files = report.input_files.len(),
        skipped = report.skipped_files.len(),
        degenerate_turbines = report.degenerate_turbines,
        "pipeline run complete"
    );

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<PipelineConfig> {
    let base = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config from '{}'", path.display()))?,
        None => PipelineConfig::default(),
    };

    let mut config = base
        .with_env_overrides()
        .context("invalid TURBINE_* environment variable")?;

    if let Some(pattern) = &cli.input_pattern {
        config.input_pattern = pattern.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(scope) = cli.fill_scope {
        config.fill_scope = scope;
    }

    Ok(config)
}
