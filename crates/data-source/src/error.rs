use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("No dataset found at any candidate location: {candidates:?}")]
    NotFound { candidates: Vec<PathBuf> },

    #[error("Dataset is missing required columns: {}", missing.join(", "))]
    SchemaError { missing: Vec<String> },

    #[error("Row {row}: cannot parse column '{column}' from value '{value}'")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: core_types::CoreError,
    },

    #[error("Duplicate record for ticker {ticker} on {date}")]
    DuplicateRecord { ticker: String, date: NaiveDate },

    #[error("I/O error while reading the dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
