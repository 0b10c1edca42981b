//! Column names shared by the wide input and the long table.

pub const COUNTRY_NAME: &str = "Country Name";
pub const COUNTRY_CODE: &str = "Country Code";
pub const CONTINENT: &str = "Continent";
pub const YEAR: &str = "Year";
pub const GDP_VALUE: &str = "GDP_Value";

/// Pseudo-region holding world aggregates; kept out of continent breakdowns.
pub const AGGREGATE_REGION: &str = "Global";

/// Inclusive bounds for a column label to count as a year.
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;
