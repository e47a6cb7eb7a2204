use crate::error::AnalyticsError;
use core_types::{EngineeredRecord, MAX_WINDOW, MIN_WINDOW};
use rust_decimal::Decimal;
use serde::Serialize;

/// User-chosen rolling-window sizes, each within `[MIN_WINDOW, MAX_WINDOW]` days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowParams {
    ma_window: usize,
    vol_window: usize,
}

impl WindowParams {
    pub fn new(ma_window: usize, vol_window: usize) -> Result<Self, AnalyticsError> {
        check_window("ma_window", ma_window)?;
        check_window("vol_window", vol_window)?;
        Ok(Self {
            ma_window,
            vol_window,
        })
    }

    pub fn ma_window(&self) -> usize {
        self.ma_window
    }

    pub fn vol_window(&self) -> usize {
        self.vol_window
    }
}

fn check_window(name: &'static str, value: usize) -> Result<(), AnalyticsError> {
    if (MIN_WINDOW..=MAX_WINDOW).contains(&value) {
        Ok(())
    } else {
        Err(AnalyticsError::WindowOutOfRange {
            name,
            value,
            min: MIN_WINDOW,
            max: MAX_WINDOW,
        })
    }
}

/// A filtered engineered row plus the series that depend on the window sizes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowedRow {
    #[serde(flatten)]
    pub record: EngineeredRecord,
    pub dynamic_ma: Option<Decimal>,
    pub dynamic_volatility: Option<Decimal>,
    pub running_max: Option<Decimal>,
    /// Percent below the running maximum; `<= 0`, and exactly `0` at a new high.
    pub drawdown: Option<Decimal>,
}

/// The filtered view with its windowed series, in date order.
///
/// Recomputed from scratch on every parameter change and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowedView {
    pub params: WindowParams,
    pub rows: Vec<WindowedRow>,
}

impl WindowedView {
    /// Distinct tickers in the order they first appear.
    pub fn tickers(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            let ticker = row.record.ticker();
            if !seen.contains(&ticker) {
                seen.push(ticker);
            }
        }
        seen
    }

    /// The date-ordered rows of one ticker.
    pub fn rows_for<'a>(&'a self, ticker: &'a str) -> impl Iterator<Item = &'a WindowedRow> + 'a {
        self.rows.iter().filter(move |r| r.record.ticker() == ticker)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds_inclusive() {
        assert!(WindowParams::new(7, 100).is_ok());
        assert!(WindowParams::new(100, 7).is_ok());
    }

    #[test]
    fn rejects_out_of_range_windows() {
        assert_eq!(
            WindowParams::new(6, 30),
            Err(AnalyticsError::WindowOutOfRange {
                name: "ma_window",
                value: 6,
                min: 7,
                max: 100
            })
        );
        assert!(matches!(
            WindowParams::new(30, 101),
            Err(AnalyticsError::WindowOutOfRange { name: "vol_window", .. })
        ));
    }
}
