pub mod errors;
pub mod measurement;
pub mod schema;
mod timestamp;

pub use errors::ParserError;
pub use measurement::parse_measurement_csv;
pub use schema::{POWER_OUTPUT, REQUIRED_COLUMNS, TIMESTAMP, TURBINE_ID};
pub use timestamp::parse_timestamp;
