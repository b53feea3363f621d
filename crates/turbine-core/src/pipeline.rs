use std::path::PathBuf;

use tracing::info;

use crate::anomaly::detect_anomalies;
use crate::cleaner::clean_dataset;
use crate::config::PipelineConfig;
use crate::error::{FileReadError, Result};
use crate::loader::load_measurements_with;
use crate::outputs::{write_artifact, Artifact, ArtifactKind};
use crate::summary::summarize;

#[derive(Debug)]
pub struct PipelineReport {
    pub input_files: Vec<PathBuf>,
    pub skipped_files: Vec<FileReadError>,
    /// In the order they were written: cleaned data, summary, anomalies.
    pub artifacts: Vec<Artifact>,
    pub degenerate_turbines: usize,
}

/// Something the operator should hear about the moment it happens.
#[derive(Debug, Clone, Copy)]
pub enum PipelineEvent<'a> {
    FileSkipped(&'a FileReadError),
    ArtifactWritten(&'a Artifact),
}

/// Runs load, clean, summarize and anomaly detection in sequence, writing each
/// stage's artifact as soon as the stage finishes.
///
/// The output directory is only created once the load has produced data, so a
/// run that finds nothing to process leaves the filesystem untouched.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    run_pipeline_with(config, |_| {})
}

/// [`run_pipeline`], reporting each skipped input file and each written
/// artifact to `on_event` as it happens. Events already delivered stay
/// delivered when a later stage fails.
pub fn run_pipeline_with<F>(config: &PipelineConfig, mut on_event: F) -> Result<PipelineReport>
where
    F: FnMut(PipelineEvent<'_>),
{
    info!(
        pattern = %config.input_pattern,
        output_dir = %config.output_dir.display(),
        fill_scope = %config.fill_scope,
        "starting pipeline run"
    );

    let loaded = load_measurements_with(&config.input_pattern, |failure| {
        on_event(PipelineEvent::FileSkipped(failure))
    })?;

    std::fs::create_dir_all(&config.output_dir)?;
    let paths = config.output_paths();
    let mut artifacts = Vec::with_capacity(3);
    let mut record = |artifact: Artifact| {
        on_event(PipelineEvent::ArtifactWritten(&artifact));
        artifacts.push(artifact);
    };

    let cleaned = clean_dataset(&loaded.dataset, config.fill_scope)?;
    record(write_artifact(
        &cleaned.dataset,
        ArtifactKind::CleanedData,
        &paths,
    )?);

    let summary = summarize(&cleaned.dataset)?;
    record(write_artifact(
        &summary,
        ArtifactKind::SummaryStatistics,
        &paths,
    )?);

    let anomalies = detect_anomalies(&cleaned.dataset)?;
    record(write_artifact(
        &anomalies.dataset,
        ArtifactKind::Anomalies,
        &paths,
    )?);

    Ok(PipelineReport {
        input_files: loaded.files,
        skipped_files: loaded.failures,
        artifacts,
        degenerate_turbines: anomalies.degenerate_groups.len(),
    })
}
