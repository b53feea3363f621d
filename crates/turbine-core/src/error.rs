// crates/turbine-core/src/error.rs

use std::path::{Path, PathBuf};

use thiserror::Error;
use turbine_parser::ParserError;

/// A single input file that could not be turned into a dataset. Never fatal
/// on its own: the loader records it and moves on to the next file.
#[derive(Error, Debug)]
pub enum FileReadError {
    #[error("Error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParserError,
    },
}

impl FileReadError {
    pub fn path(&self) -> &Path {
        match self {
            FileReadError::Io { path, .. } | FileReadError::Parse { path, .. } => path,
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No input data could be loaded for pattern '{pattern}'")]
    NoData { pattern: String },

    #[error("Invalid input pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Required column '{0}' is missing from the dataset")]
    MissingColumn(&'static str),

    #[error("Column '{column}' has unsupported type {dtype}")]
    UnsupportedColumnType { column: &'static str, dtype: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
