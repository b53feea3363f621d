pub const TURBINE_ID: &str = "turbine_id";
pub const TIMESTAMP: &str = "timestamp";
pub const POWER_OUTPUT: &str = "power_output";

pub const REQUIRED_COLUMNS: [&str; 3] = [TURBINE_ID, TIMESTAMP, POWER_OUTPUT];
