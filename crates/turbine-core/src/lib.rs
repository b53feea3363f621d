pub mod anomaly;
pub mod cleaner;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod outputs;
pub mod pipeline;
pub mod summary;

pub use turbine_parser::{POWER_OUTPUT, TIMESTAMP, TURBINE_ID};
