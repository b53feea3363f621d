use std::collections::HashSet;

use csv::StringRecord;
use polars::prelude::*;

use crate::errors::ParserError;
use crate::schema::{REQUIRED_COLUMNS, TIMESTAMP};
use crate::timestamp::parse_timestamp;

enum ColumnBuffer {
    Timestamp(Vec<Option<i64>>),
    Text(Vec<Option<String>>),
}

impl ColumnBuffer {
    fn for_column(name: &str) -> Self {
        if name == TIMESTAMP {
            ColumnBuffer::Timestamp(Vec::new())
        } else {
            ColumnBuffer::Text(Vec::new())
        }
    }

    fn push(&mut self, cell: Option<&str>, line_index: usize) -> Result<(), ParserError> {
        match self {
            ColumnBuffer::Timestamp(values) => {
                let parsed = match cell {
                    Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| {
                        ParserError::DataRow {
                            line_index,
                            message: format!("invalid timestamp '{raw}'"),
                        }
                    })?),
                    None => None,
                };
                values.push(parsed);
            }
            ColumnBuffer::Text(values) => values.push(cell.map(str::to_string)),
        }
        Ok(())
    }

    fn into_column(self, name: &str) -> Result<Column, ParserError> {
        let series = match self {
            ColumnBuffer::Timestamp(values) => Series::new(name.into(), values)
                .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
                .map_err(|err| ParserError::Validation {
                    message: format!("failed to cast timestamp column: {err}"),
                })?,
            ColumnBuffer::Text(values) => {
                let utf8: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
                Series::new(name.into(), utf8)
            }
        };
        Ok(series.into())
    }
}

/// Parses one comma-delimited measurement file into a DataFrame.
///
/// The header row names the columns. `timestamp` becomes a microsecond
/// `Datetime` column and every other column, `power_output` included, is
/// kept as text so later stages decide how to coerce it. Empty cells are null.
pub fn parse_measurement_csv(content: &str) -> Result<DataFrame, ParserError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let header = records.next().ok_or(ParserError::MissingHeader)??;
    let names = parse_header(&header)?;

    let mut buffers: Vec<ColumnBuffer> = names
        .iter()
        .map(|name| ColumnBuffer::for_column(name))
        .collect();

    for (row_idx, record) in records.enumerate() {
        let record = record?;
        // line 1 is the header
        let line_index = row_idx + 2;

        if record.len() > names.len() {
            return Err(ParserError::DataRow {
                line_index,
                message: format!(
                    "expected at most {} fields, found {}",
                    names.len(),
                    record.len()
                ),
            });
        }

        for (col_idx, buffer) in buffers.iter_mut().enumerate() {
            buffer.push(clean_cell(record.get(col_idx)), line_index)?;
        }
    }

    let columns = names
        .iter()
        .zip(buffers)
        .map(|(name, buffer)| buffer.into_column(name))
        .collect::<Result<Vec<_>, _>>()?;

    DataFrame::new(columns).map_err(|err| ParserError::Validation {
        message: format!("failed to build measurement dataframe: {err}"),
    })
}

fn parse_header(header: &StringRecord) -> Result<Vec<String>, ParserError> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(header.len());

    for (column_index, raw) in header.iter().enumerate() {
        let name = raw.trim_start_matches('\u{feff}').trim();
        if name.is_empty() {
            return Err(ParserError::InvalidHeader {
                column_index,
                message: "blank column name".to_string(),
            });
        }
        if !seen.insert(name.to_string()) {
            return Err(ParserError::InvalidHeader {
                column_index,
                message: format!("duplicate column name '{name}'"),
            });
        }
        names.push(name.to_string());
    }

    for required in REQUIRED_COLUMNS {
        if !names.iter().any(|name| name == required) {
            return Err(ParserError::MissingColumn { column: required });
        }
    }

    Ok(names)
}

fn clean_cell(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
