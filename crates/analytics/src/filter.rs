use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::EngineeredRecord;
use serde::Serialize;

/// An inclusive calendar interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The smallest range covering every record, or `None` for an empty table.
    pub fn spanning(records: &[EngineeredRecord]) -> Option<Self> {
        let start = records.iter().map(|r| r.date()).min()?;
        let end = records.iter().map(|r| r.date()).max()?;
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Restricts the engineered table to the selected tickers and date range.
///
/// The result is ordered by date; rows sharing a date keep the order in which they
/// appear in `records`. A selected ticker with no rows in range contributes
/// nothing, and an empty selection yields an empty view.
pub fn filter_records(
    records: &[EngineeredRecord],
    tickers: &[String],
    range: DateRange,
) -> Vec<EngineeredRecord> {
    let mut view: Vec<EngineeredRecord> = records
        .iter()
        .filter(|r| tickers.iter().any(|t| t == r.ticker()) && range.contains(r.date()))
        .cloned()
        .collect();

    // `sort_by_key` is stable, which preserves the encounter order within a date.
    view.sort_by_key(|r| r.date());

    tracing::debug!(
        rows = view.len(),
        tickers = tickers.len(),
        start = %range.start,
        end = %range.end,
        "Filtered engineered table."
    );
    view
}
