use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("file did not contain a header row")]
    MissingHeader,

    #[error("header column {column_index} invalid: {message}")]
    InvalidHeader {
        column_index: usize,
        message: String,
    },

    #[error("required column '{column}' not found in header")]
    MissingColumn { column: &'static str },

    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("data row {line_index} invalid: {message}")]
    DataRow { line_index: usize, message: String },

    #[error("validation error: {message}")]
    Validation { message: String },
}

impl From<csv::Error> for ParserError {
    fn from(source: csv::Error) -> Self {
        ParserError::Csv { source }
    }
}
