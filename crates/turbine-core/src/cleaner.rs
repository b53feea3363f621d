use polars::prelude::*;
use tracing::{debug, info};

use crate::config::FillScope;
use crate::dataset::require_column;
use crate::error::{PipelineError, Result};
use crate::{POWER_OUTPUT, TURBINE_ID};

#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub dataset: DataFrame,
    /// Values present in the source that could not be read as numbers.
    pub coerced_invalid: usize,
    /// Missing values repaired by forward fill.
    pub filled: usize,
    /// Missing values with no earlier value to copy.
    pub unfilled: usize,
}

/// Coerces `power_output` to numbers, then forward-fills the gaps.
pub fn clean_dataset(df: &DataFrame, scope: FillScope) -> Result<CleanedDataset> {
    let (values, coerced_invalid) = coerce_power_output(df)?;
    let coerced = Series::new(POWER_OUTPUT.into(), values);
    let missing_before = coerced.null_count();

    let mut dataset = df.clone();
    dataset.with_column(coerced)?;
    let dataset = forward_fill(dataset, scope)?;

    let unfilled = require_column(&dataset, POWER_OUTPUT)?.null_count();
    let filled = missing_before - unfilled;

    if coerced_invalid > 0 {
        debug!(count = coerced_invalid, "non-numeric power_output values treated as missing");
    }
    info!(
        rows = dataset.height(),
        scope = %scope,
        filled,
        unfilled,
        "cleaned power_output"
    );

    Ok(CleanedDataset {
        dataset,
        coerced_invalid,
        filled,
        unfilled,
    })
}

/// Replaces each null `power_output` with the nearest earlier value, either
/// across the whole dataset or within the row's turbine. A leading run of
/// nulls has nothing to copy and stays null.
pub fn forward_fill(mut df: DataFrame, scope: FillScope) -> Result<DataFrame> {
    match scope {
        FillScope::Dataset => {
            let filled = require_column(&df, POWER_OUTPUT)?
                .as_materialized_series()
                .fill_null(FillNullStrategy::Forward(None))?;
            df.with_column(filled)?;
            Ok(df)
        }
        FillScope::Turbine => {
            require_column(&df, POWER_OUTPUT)?;
            require_column(&df, TURBINE_ID)?;
            Ok(df
                .lazy()
                .with_column(
                    col(POWER_OUTPUT)
                        .fill_null_with_strategy(FillNullStrategy::Forward(None))
                        .over([col(TURBINE_ID)]),
                )
                .collect()?)
        }
    }
}

/// Reads `power_output` as `f64`, returning the values and how many present
/// values had to be discarded. Text is trimmed before parsing; empty text and
/// NaN count as missing.
pub fn coerce_power_output(df: &DataFrame) -> Result<(Vec<Option<f64>>, usize)> {
    let column = require_column(df, POWER_OUTPUT)?;
    let mut invalid = 0usize;

    let values: Vec<Option<f64>> = match column.dtype() {
        DataType::String => column
            .str()?
            .into_iter()
            .map(|value| {
                let value = value?;
                let parsed = parse_optional_f64(value);
                if parsed.is_none() && !is_missing_marker(value) {
                    invalid += 1;
                }
                parsed
            })
            .collect(),
        dtype if dtype.is_primitive_numeric() || dtype == &DataType::Null => {
            let cast = column.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|value| value.filter(|v| !v.is_nan()))
                .collect()
        }
        other => {
            return Err(PipelineError::UnsupportedColumnType {
                column: POWER_OUTPUT,
                dtype: other.to_string(),
            })
        }
    };

    Ok((values, invalid))
}

fn parse_optional_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if is_missing_marker(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn is_missing_marker(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}
