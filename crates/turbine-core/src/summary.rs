use polars::prelude::*;
use tracing::info;

use crate::dataset::{require_column, require_numeric_power_output, turbine_ids, turbine_order, TurbineId};
use crate::error::Result;
use crate::{POWER_OUTPUT, TURBINE_ID};

pub const MIN_POWER_OUTPUT: &str = "min_power_output";
pub const MAX_POWER_OUTPUT: &str = "max_power_output";
pub const AVG_POWER_OUTPUT: &str = "avg_power_output";

#[derive(Debug, Clone, PartialEq)]
pub struct TurbineSummary {
    pub turbine_id: Option<TurbineId>,
    pub min_power_output: Option<f64>,
    pub max_power_output: Option<f64>,
    pub avg_power_output: Option<f64>,
}

/// Summary table with one row per turbine in ascending id order, missing id
/// last. The `turbine_id` column keeps the dataset's type. Missing values are
/// ignored, so a turbine with none left gets nulls for all three statistics.
pub fn summarize(df: &DataFrame) -> Result<DataFrame> {
    require_column(df, TURBINE_ID)?;
    require_numeric_power_output(df)?;

    let summary = df
        .clone()
        .lazy()
        .group_by([col(TURBINE_ID)])
        .agg([
            col(POWER_OUTPUT).min().alias(MIN_POWER_OUTPUT),
            col(POWER_OUTPUT).max().alias(MAX_POWER_OUTPUT),
            col(POWER_OUTPUT).mean().alias(AVG_POWER_OUTPUT),
        ])
        .sort([TURBINE_ID], turbine_order())
        .collect()?;

    info!(turbines = summary.height(), "summarized power_output");

    Ok(summary)
}

/// [`summarize`] read back as plain records.
pub fn summary_records(df: &DataFrame) -> Result<Vec<TurbineSummary>> {
    let summary = summarize(df)?;

    let ids = turbine_ids(summary.column(TURBINE_ID)?)?;
    let mins = summary.column(MIN_POWER_OUTPUT)?.f64()?;
    let maxs = summary.column(MAX_POWER_OUTPUT)?.f64()?;
    let avgs = summary.column(AVG_POWER_OUTPUT)?.f64()?;

    Ok(ids
        .into_iter()
        .zip(mins.into_iter().zip(maxs).zip(avgs))
        .map(|(turbine_id, ((min, max), avg))| TurbineSummary {
            turbine_id,
            min_power_output: min,
            max_power_output: max,
            avg_power_output: avg,
        })
        .collect())
}
