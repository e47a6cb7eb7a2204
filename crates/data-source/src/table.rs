use crate::source::{DataOrigin, LoadedDataset};
use chrono::NaiveDate;
use core_types::EngineeredRecord;
use features::FeatureEngine;

/// The engineered table of one loaded dataset, ready for filtering.
#[derive(Debug, Clone)]
pub struct EngineeredTable {
    pub origin: DataOrigin,
    /// Whether the source already carried the derived columns.
    pub pre_featured: bool,
    /// The latest date in the data.
    pub last_updated: Option<NaiveDate>,
    pub records: Vec<EngineeredRecord>,
}

impl EngineeredTable {
    /// Runs the feature engine over a loaded dataset.
    pub fn build(loaded: LoadedDataset, engine: &FeatureEngine) -> Self {
        let pre_featured = loaded.dataset.has_features();
        let last_updated = loaded.dataset.last_date();
        let records = engine.engineer(loaded.dataset);

        Self {
            origin: loaded.origin,
            pre_featured,
            last_updated,
            records,
        }
    }

    /// Distinct tickers, sorted.
    pub fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.records.iter().map(|r| r.ticker().to_string()).collect();
        tickers.sort();
        tickers.dedup();
        tickers
    }

    /// Earliest and latest dates in the table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date()).min()?;
        let max = self.records.iter().map(|r| r.date()).max()?;
        Some((min, max))
    }
}
