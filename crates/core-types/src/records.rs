use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the input dataset: the daily OHLC prices of a single ticker.
///
/// A dataset holds at most one `DailyRecord` per (ticker, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl DailyRecord {
    /// Creates a record, trimming the ticker and rejecting an empty one.
    pub fn new(
        ticker: &str,
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> Result<Self, CoreError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(CoreError::InvalidInput(
                "ticker".to_string(),
                format!("empty ticker on {}", date),
            ));
        }
        Ok(Self {
            ticker: ticker.to_string(),
            date,
            open,
            high,
            low,
            close,
        })
    }
}

/// The derived columns attached to every engineered row.
///
/// `None` means "no value": the row sits before the end of a rolling window, or a
/// denominator was zero. It is never a stand-in for zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub daily_change: Option<Decimal>,
    pub daily_pct_change: Option<Decimal>,
    pub price_range: Option<Decimal>,
    pub average_price: Option<Decimal>,
    pub ma_7d: Option<Decimal>,
    pub volatility_7d: Option<Decimal>,
}

/// A `DailyRecord` plus its derived features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineeredRecord {
    #[serde(flatten)]
    pub daily: DailyRecord,
    #[serde(flatten)]
    pub features: Features,
}

impl EngineeredRecord {
    pub fn ticker(&self) -> &str {
        &self.daily.ticker
    }

    pub fn date(&self) -> NaiveDate {
        self.daily.date
    }

    pub fn close(&self) -> Decimal {
        self.daily.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn trims_ticker() {
        let record = DailyRecord::new(" BTC ", day(), dec!(1), dec!(2), dec!(0.5), dec!(1.5)).unwrap();
        assert_eq!(record.ticker, "BTC");
    }

    #[test]
    fn rejects_empty_ticker() {
        let result = DailyRecord::new("  ", day(), dec!(1), dec!(2), dec!(0.5), dec!(1.5));
        assert!(matches!(result, Err(CoreError::InvalidInput(field, _)) if field == "ticker"));
    }
}
