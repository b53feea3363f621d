use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::outputs::OutputPaths;

pub const DEFAULT_INPUT_PATTERN: &str = "input_data/data_group_*.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "output_data";

pub const ENV_INPUT_PATTERN: &str = "TURBINE_INPUT_PATTERN";
pub const ENV_OUTPUT_DIR: &str = "TURBINE_OUTPUT_DIR";
pub const ENV_FILL_SCOPE: &str = "TURBINE_FILL_SCOPE";

/// Row order the cleaner walks when forward-filling `power_output`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillScope {
    /// One pass over the concatenated dataset, regardless of turbine.
    #[default]
    Dataset,
    /// An independent pass inside each turbine's rows.
    Turbine,
}

impl FillScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            FillScope::Dataset => "dataset",
            FillScope::Turbine => "turbine",
        }
    }
}

impl fmt::Display for FillScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillScope {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dataset" | "global" => Ok(FillScope::Dataset),
            "turbine" | "group" => Ok(FillScope::Turbine),
            other => Err(PipelineError::Config(format!(
                "unknown fill scope '{other}' (expected 'dataset' or 'turbine')"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub input_pattern: String,
    pub output_dir: PathBuf,
    pub fill_scope: FillScope,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_pattern: DEFAULT_INPUT_PATTERN.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            fill_scope: FillScope::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Layers `TURBINE_*` environment variables over the current values.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(pattern) = lookup(ENV_INPUT_PATTERN) {
            self.input_pattern = pattern;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(scope) = lookup(ENV_FILL_SCOPE) {
            self.fill_scope = scope.parse()?;
        }
        Ok(self)
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::new(&self.output_dir)
    }
}
