use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

use crate::error::Result;

pub const CLEANED_DATA_FILE: &str = "cleaned_data.csv";
pub const SUMMARY_STATISTICS_FILE: &str = "summary_statistics.csv";
pub const ANOMALIES_FILE: &str = "anomalies.csv";

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    CleanedData,
    SummaryStatistics,
    Anomalies,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::CleanedData => "Cleaned data",
            ArtifactKind::SummaryStatistics => "Summary statistics",
            ArtifactKind::Anomalies => "Anomalies",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file the pipeline wrote, with the number of data rows in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub rows: usize,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} written to file: {}", self.kind, self.path.display())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub cleaned_data: PathBuf,
    pub summary_statistics: PathBuf,
    pub anomalies: PathBuf,
}

impl OutputPaths {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            cleaned_data: output_dir.join(CLEANED_DATA_FILE),
            summary_statistics: output_dir.join(SUMMARY_STATISTICS_FILE),
            anomalies: output_dir.join(ANOMALIES_FILE),
        }
    }

    pub fn path_for(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::CleanedData => &self.cleaned_data,
            ArtifactKind::SummaryStatistics => &self.summary_statistics,
            ArtifactKind::Anomalies => &self.anomalies,
        }
    }
}

/// Writes `df` as comma-delimited text with a header row and no index column.
/// Nulls become empty fields. A zero-row frame still gets its header.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut frame = df.clone();

    CsvWriter::new(&mut writer)
        .include_header(true)
        .with_separator(b',')
        .with_datetime_format(Some(DATETIME_FORMAT.to_string()))
        .finish(&mut frame)?;
    writer.flush()?;

    Ok(())
}

pub fn write_artifact(df: &DataFrame, kind: ArtifactKind, paths: &OutputPaths) -> Result<Artifact> {
    let path = paths.path_for(kind).to_path_buf();
    write_csv(df, &path)?;
    info!(artifact = %kind, path = %path.display(), rows = df.height(), "wrote artifact");

    Ok(Artifact {
        kind,
        path,
        rows: df.height(),
    })
}
