use crate::rolling::{diff, pct_change, rolling_mean, rolling_std, round_opt};
use core_types::{DailyRecord, Dataset, EngineeredRecord, Features, FEATURE_WINDOW, ROUND_DP};
use rust_decimal::Decimal;

/// Derives the canonical engineered-feature table from daily OHLC records.
///
/// The engine is stateless: the same input always yields the same table.
#[derive(Debug, Clone)]
pub struct FeatureEngine {
    window: usize,
    decimals: u32,
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self {
            window: FEATURE_WINDOW,
            decimals: ROUND_DP,
        }
    }
}

impl FeatureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the engineered table for a loaded dataset.
    ///
    /// A dataset that already carries the derived columns is returned as-is, in its
    /// file order. A raw dataset has its features derived.
    pub fn engineer(&self, dataset: Dataset) -> Vec<EngineeredRecord> {
        match dataset {
            Dataset::Featured(records) => {
                tracing::debug!(rows = records.len(), "Dataset is pre-featured; skipping derivation.");
                records
            }
            Dataset::Raw(records) => self.derive(records),
        }
    }

    /// Derives all features from raw records, which may arrive in any order.
    ///
    /// The output is sorted by (ticker, date) ascending. Each ticker's series is
    /// processed independently, so windows never straddle two tickers.
    pub fn derive(&self, mut records: Vec<DailyRecord>) -> Vec<EngineeredRecord> {
        records.sort_by(|a, b| a.ticker.cmp(&b.ticker).then(a.date.cmp(&b.date)));

        let mut engineered = Vec::with_capacity(records.len());
        let mut start = 0;
        let mut tickers = 0usize;

        while start < records.len() {
            let ticker = &records[start].ticker;
            let end = start
                + records[start..]
                    .iter()
                    .take_while(|r| &r.ticker == ticker)
                    .count();

            engineered.extend(self.derive_ticker(&records[start..end]));
            tickers += 1;
            start = end;
        }

        tracing::info!(rows = engineered.len(), tickers, "Derived engineered features.");
        engineered
    }

    /// Computes the features for one ticker's date-sorted series.
    fn derive_ticker(&self, series: &[DailyRecord]) -> Vec<EngineeredRecord> {
        let closes: Vec<Option<Decimal>> = series.iter().map(|r| Some(r.close)).collect();

        let daily_change = diff(&closes);
        let daily_pct_change = pct_change(&closes);
        let ma = rolling_mean(&closes, self.window);
        // Returns are already in percent, so their deviation is the volatility in percent.
        let volatility = rolling_std(&daily_pct_change, self.window);

        let dp = self.decimals;
        series
            .iter()
            .enumerate()
            .map(|(i, record)| EngineeredRecord {
                daily: DailyRecord {
                    ticker: record.ticker.clone(),
                    date: record.date,
                    open: record.open.round_dp(dp),
                    high: record.high.round_dp(dp),
                    low: record.low.round_dp(dp),
                    close: record.close.round_dp(dp),
                },
                features: Features {
                    daily_change: round_opt(daily_change[i], dp),
                    daily_pct_change: round_opt(daily_pct_change[i], dp),
                    price_range: round_opt(record.high.checked_sub(record.low), dp),
                    average_price: round_opt(average(record.high, record.low), dp),
                    ma_7d: round_opt(ma[i], dp),
                    volatility_7d: round_opt(volatility[i], dp),
                },
            })
            .collect()
    }
}

fn average(high: Decimal, low: Decimal) -> Option<Decimal> {
    high.checked_add(low)?.checked_div(Decimal::TWO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;

    fn records(ticker: &str, closes: &[Decimal]) -> Vec<DailyRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                DailyRecord::new(
                    ticker,
                    start + Duration::days(i as i64),
                    *close,
                    *close + dec!(2),
                    *close - dec!(3),
                    *close,
                )
                .unwrap()
            })
            .collect()
    }

    fn ramp(len: usize) -> Vec<Decimal> {
        (0..len).map(|i| Decimal::from(100 + 5 * i as i64)).collect()
    }

    #[test]
    fn sorts_by_ticker_then_date() {
        let mut input = records("ETH", &ramp(3));
        input.extend(records("BTC", &ramp(3)));
        input.reverse();

        let out = FeatureEngine::new().derive(input);
        let keys: Vec<(&str, u32)> = out
            .iter()
            .map(|r| (r.ticker(), chrono::Datelike::day(&r.date())))
            .collect();
        assert_eq!(
            keys,
            vec![("BTC", 1), ("BTC", 2), ("BTC", 3), ("ETH", 1), ("ETH", 2), ("ETH", 3)]
        );
    }

    #[test]
    fn derives_point_features() {
        let out = FeatureEngine::new().derive(records("BTC", &[dec!(100), dec!(110)]));

        assert_eq!(out[0].features.daily_change, None);
        assert_eq!(out[0].features.daily_pct_change, None);
        assert_eq!(out[1].features.daily_change, Some(dec!(10)));
        assert_eq!(out[1].features.daily_pct_change, Some(dec!(10)));
        assert_eq!(out[1].features.price_range, Some(dec!(5)));
        assert_eq!(out[1].features.average_price, Some(dec!(109.5)));
    }

    #[test]
    fn rolling_features_are_undefined_until_the_window_fills() {
        let out = FeatureEngine::new().derive(records("BTC", &ramp(10)));

        for row in &out[..6] {
            assert_eq!(row.features.ma_7d, None);
            assert_eq!(row.features.volatility_7d, None);
        }
        assert_eq!(out[6].features.ma_7d, Some(dec!(115)));
        // The first return only exists from the second row on, so seven returns
        // are available from the eighth row.
        assert_eq!(out[6].features.volatility_7d, None);
        assert!(out[7].features.volatility_7d.is_some());
        assert!(out[9].features.ma_7d.is_some());
    }

    #[test]
    fn windows_restart_for_each_ticker() {
        let mut input = records("AAA", &ramp(8));
        input.extend(records("BBB", &ramp(3)));

        let out = FeatureEngine::new().derive(input);
        let bbb: Vec<_> = out.iter().filter(|r| r.ticker() == "BBB").collect();

        assert_eq!(bbb[0].features.daily_change, None);
        assert!(bbb.iter().all(|r| r.features.ma_7d.is_none()));
    }

    #[test]
    fn rounds_every_numeric_column_to_four_places() {
        let out = FeatureEngine::new().derive(records(
            "BTC",
            &[dec!(3), dec!(3.333333), dec!(3.1), dec!(3.2), dec!(3.9), dec!(3.7), dec!(3.01), dec!(3.5)],
        ));

        for row in &out {
            assert!(row.daily.close.scale() <= 4);
            let values = [
                row.features.daily_change,
                row.features.daily_pct_change,
                row.features.price_range,
                row.features.average_price,
                row.features.ma_7d,
                row.features.volatility_7d,
            ];
            assert!(values.iter().flatten().all(|v| v.scale() <= 4));
        }
        assert_eq!(out[1].daily.close, dec!(3.3333));
    }

    #[test]
    fn engineering_a_featured_dataset_is_a_no_op() {
        let engine = FeatureEngine::new();
        let once = engine.derive(records("BTC", &ramp(9)));
        let twice = engine.engineer(Dataset::Featured(once.clone()));

        assert_eq!(once, twice);
    }

    #[test]
    fn volatility_is_zero_for_a_constant_return_series() {
        // Every step is exactly +100%, so all seven returns are equal.
        let closes: Vec<Decimal> = (0..9).map(|i| Decimal::from(1i64 << i)).collect();
        let out = FeatureEngine::new().derive(records("BTC", &closes));

        assert_eq!(out[7].features.volatility_7d, Some(Decimal::ZERO));
    }
}
