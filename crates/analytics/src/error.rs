use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("{name} must be between {min} and {max} days, got {value}")]
    WindowOutOfRange {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}
