use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Data source error: {0}")]
    DataSource(#[from] data_source::DataSourceError),

    #[error("The dataset contains no rows.")]
    EmptyDataset,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
