use crate::error::DashboardError;
use analytics::{AnalyticsError, DateRange, WindowParams};
use chrono::NaiveDate;
use configuration::DashboardConfig;
use data_source::EngineeredTable;
use serde::Serialize;

/// The user's current selection. Every change produces a fresh view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardState {
    pub tickers: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ma_window: usize,
    pub vol_window: usize,
}

impl DashboardState {
    /// The initial selection for a freshly loaded table.
    ///
    /// Selects the configured default ticker if the table has it, otherwise the
    /// alphabetically first ticker, over the full date range of the table.
    pub fn defaults(table: &EngineeredTable, config: &DashboardConfig) -> Result<Self, DashboardError> {
        let (start, end) = table.date_bounds().ok_or(DashboardError::EmptyDataset)?;
        let available = table.tickers();

        let preferred = &config.selection.default_ticker;
        let tickers = if available.contains(preferred) {
            vec![preferred.clone()]
        } else {
            tracing::debug!(ticker = %preferred, "Default ticker absent; selecting the first available.");
            available.into_iter().take(1).collect()
        };

        Ok(Self {
            tickers,
            start,
            end,
            ma_window: config.windows.ma_window,
            vol_window: config.windows.vol_window,
        })
    }

    pub fn window_params(&self) -> Result<WindowParams, AnalyticsError> {
        WindowParams::new(self.ma_window, self.vol_window)
    }

    pub fn date_range(&self) -> Result<DateRange, AnalyticsError> {
        DateRange::new(self.start, self.end)
    }

    /// Checks the window bounds and the date order.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        self.window_params()?;
        self.date_range()?;
        Ok(())
    }
}
