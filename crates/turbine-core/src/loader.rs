use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{debug, info, warn};
use turbine_parser::parse_measurement_csv;

use crate::dataset::{concat_datasets, infer_column_types};
use crate::error::{FileReadError, PipelineError, Result};
use crate::POWER_OUTPUT;

/// Concatenated measurements plus the per-file outcome of the load.
#[derive(Debug)]
pub struct LoadedDataset {
    pub dataset: DataFrame,
    pub files: Vec<PathBuf>,
    pub failures: Vec<FileReadError>,
}

/// Files matched by `pattern`, sorted so every run visits them in the same
/// order. Paths the glob walker could not read come back as failures.
pub fn discover_files(pattern: &str) -> Result<(Vec<PathBuf>, Vec<FileReadError>)> {
    let mut paths = Vec::new();
    let mut failures = Vec::new();

    for entry in glob::glob(pattern)? {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    paths.push(path);
                }
            }
            Err(err) => {
                let path = err.path().to_path_buf();
                failures.push(FileReadError::Io {
                    path,
                    source: err.into(),
                });
            }
        }
    }

    paths.sort();
    Ok((paths, failures))
}

pub fn read_measurement_file(path: &Path) -> std::result::Result<DataFrame, FileReadError> {
    let content = std::fs::read_to_string(path).map_err(|source| FileReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_measurement_csv(&content).map_err(|source| FileReadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads every file matching `pattern` into one dataset.
///
/// A file that fails to read or parse is logged and skipped. Only when no file
/// at all could be parsed does the load fail, with [`PipelineError::NoData`].
pub fn load_measurements(pattern: &str) -> Result<LoadedDataset> {
    load_measurements_with(pattern, |_| {})
}

/// [`load_measurements`], handing each skipped file to `on_failure` as soon as
/// it fails, before the load decides whether any data came through.
pub fn load_measurements_with<F>(pattern: &str, mut on_failure: F) -> Result<LoadedDataset>
where
    F: FnMut(&FileReadError),
{
    let (paths, mut failures) = discover_files(pattern)?;
    for failure in &failures {
        warn!(path = %failure.path().display(), error = %failure, "skipping unreadable path");
        on_failure(failure);
    }
    debug!(pattern, matched = paths.len(), "discovered input files");

    let mut frames = Vec::with_capacity(paths.len());
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        match read_measurement_file(&path) {
            Ok(df) => {
                debug!(path = %path.display(), rows = df.height(), "parsed input file");
                frames.push(df);
                files.push(path);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping input file");
                on_failure(&err);
                failures.push(err);
            }
        }
    }

    if frames.is_empty() {
        return Err(PipelineError::NoData {
            pattern: pattern.to_string(),
        });
    }

    let combined = concat_datasets(frames)?;
    let dataset = infer_column_types(&combined, &[POWER_OUTPUT])?;

    info!(
        files = files.len(),
        skipped = failures.len(),
        rows = dataset.height(),
        "loaded measurements"
    );

    Ok(LoadedDataset {
        dataset,
        files,
        failures,
    })
}
