use std::collections::HashMap;
use std::fmt;

use polars::prelude::*;

use crate::error::{PipelineError, Result};
use crate::POWER_OUTPUT;

/// A `turbine_id` value as read back from a grouped frame.
#[derive(Debug, Clone, PartialEq)]
pub enum TurbineId {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for TurbineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurbineId::Integer(id) => write!(f, "{id}"),
            TurbineId::Float(id) => write!(f, "{id}"),
            TurbineId::Text(id) => f.write_str(id),
        }
    }
}

pub fn require_column<'a>(df: &'a DataFrame, name: &'static str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| PipelineError::MissingColumn(name))
}

/// Stacks per-file frames into one dataset.
///
/// The column set is the union of every frame's columns in first-seen order.
/// A frame lacking a column gets a null-filled one so no column is dropped.
pub fn concat_datasets(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut names: Vec<PlSmallStr> = Vec::new();
    let mut dtypes: HashMap<PlSmallStr, DataType> = HashMap::new();

    for df in &frames {
        for column in df.get_columns() {
            if !dtypes.contains_key(column.name()) {
                names.push(column.name().clone());
                dtypes.insert(column.name().clone(), column.dtype().clone());
            }
        }
    }

    let mut iter = frames.into_iter();
    let Some(first) = iter.next() else {
        return Ok(DataFrame::default());
    };

    let mut combined = align_columns(first, &names, &dtypes)?;
    for df in iter {
        combined.vstack_mut(&align_columns(df, &names, &dtypes)?)?;
    }

    Ok(combined)
}

fn align_columns(
    mut df: DataFrame,
    names: &[PlSmallStr],
    dtypes: &HashMap<PlSmallStr, DataType>,
) -> Result<DataFrame> {
    let height = df.height();
    for name in names {
        if df.get_column_index(name).is_none() {
            let dtype = dtypes.get(name).cloned().unwrap_or(DataType::String);
            df.with_column(Series::full_null(name.clone(), height, &dtype))?;
        }
    }
    Ok(df.select(names.iter().cloned())?)
}

/// Narrows text columns to `Int64` or `Float64` when every non-null value
/// parses as such. Columns named in `keep_text` are left untouched.
pub fn infer_column_types(df: &DataFrame, keep_text: &[&str]) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        if column.dtype() != &DataType::String || keep_text.contains(&column.name().as_str()) {
            columns.push(column.clone());
            continue;
        }
        columns.push(infer_text_column(column.name().clone(), column.str()?));
    }

    Ok(DataFrame::new(columns)?)
}

fn infer_text_column(name: PlSmallStr, values: &StringChunked) -> Column {
    let integers: Option<Vec<Option<i64>>> = values
        .into_iter()
        .map(|value| match value {
            None => Some(None),
            Some(text) => text.parse::<i64>().ok().map(Some),
        })
        .collect();
    if let Some(integers) = integers {
        return Series::new(name, integers).into();
    }

    let floats: Option<Vec<Option<f64>>> = values
        .into_iter()
        .map(|value| match value {
            None => Some(None),
            Some(text) => text
                .parse::<f64>()
                .ok()
                .map(|value| (!value.is_nan()).then_some(value)),
        })
        .collect();
    if let Some(floats) = floats {
        return Series::new(name, floats).into();
    }

    values.clone().into_series().into()
}

/// Reads an id column into [`TurbineId`] values, keeping the numeric kind
/// the loader inferred.
pub fn turbine_ids(column: &Column) -> Result<Vec<Option<TurbineId>>> {
    let dtype = column.dtype();
    let ids = if dtype.is_integer() {
        let cast = column.cast(&DataType::Int64)?;
        cast.i64()?
            .into_iter()
            .map(|value| value.map(TurbineId::Integer))
            .collect()
    } else if dtype.is_float() {
        let cast = column.cast(&DataType::Float64)?;
        cast.f64()?
            .into_iter()
            .map(|value| value.map(TurbineId::Float))
            .collect()
    } else {
        let cast = column.cast(&DataType::String)?;
        cast.str()?
            .into_iter()
            .map(|value| value.map(|text| TurbineId::Text(text.to_string())))
            .collect()
    };
    Ok(ids)
}

/// Fails unless `power_output` is already `Float64`, which the cleaner
/// guarantees.
pub fn require_numeric_power_output(df: &DataFrame) -> Result<()> {
    let column = require_column(df, POWER_OUTPUT)?;
    if column.dtype() != &DataType::Float64 {
        return Err(PipelineError::UnsupportedColumnType {
            column: POWER_OUTPUT,
            dtype: column.dtype().to_string(),
        });
    }
    Ok(())
}

/// Ascending `turbine_id` order with the missing-id rows last. Ties keep
/// their dataset order.
pub fn turbine_order() -> SortMultipleOptions {
    SortMultipleOptions::default()
        .with_nulls_last(true)
        .with_maintain_order(true)
}
