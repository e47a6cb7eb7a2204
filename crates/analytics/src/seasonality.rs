use crate::view::WindowedView;
use core_types::DayOfWeek;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Average daily % change of one ticker on one weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalityRow {
    pub weekday: DayOfWeek,
    pub ticker: String,
    /// Mean over the defined daily % changes; `None` if the group has none.
    pub avg_daily_pct_change: Option<Decimal>,
}

/// Groups the view by (weekday, ticker) and averages `Daily % change`.
///
/// Exactly one row is produced per (weekday, ticker) pair present in the view,
/// ordered Monday through Sunday and then by ticker.
pub fn weekday_seasonality(view: &WindowedView) -> Vec<SeasonalityRow> {
    let mut groups: BTreeMap<(DayOfWeek, &str), (Decimal, usize)> = BTreeMap::new();

    for row in &view.rows {
        let key = (DayOfWeek::from_date(row.record.date()), row.record.ticker());
        let entry = groups.entry(key).or_insert((Decimal::ZERO, 0));
        if let Some(pct) = row.record.features.daily_pct_change {
            entry.0 += pct;
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|((weekday, ticker), (sum, count))| SeasonalityRow {
            weekday,
            ticker: ticker.to_string(),
            avg_daily_pct_change: if count == 0 {
                None
            } else {
                sum.checked_div(Decimal::from(count))
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{WindowParams, WindowedRow};
    use chrono::{Duration, NaiveDate};
    use core_types::{DailyRecord, EngineeredRecord, Features};
    use rust_decimal_macros::dec;

    fn row(ticker: &str, offset: i64, pct: Option<Decimal>) -> WindowedRow {
        // 2024-01-07 was a Sunday, so offset 1 is a Monday.
        let date = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap() + Duration::days(offset);
        WindowedRow {
            record: EngineeredRecord {
                daily: DailyRecord::new(ticker, date, dec!(1), dec!(1), dec!(1), dec!(1)).unwrap(),
                features: Features {
                    daily_pct_change: pct,
                    ..Features::default()
                },
            },
            dynamic_ma: None,
            dynamic_volatility: None,
            running_max: None,
            drawdown: None,
        }
    }

    fn view(rows: Vec<WindowedRow>) -> WindowedView {
        WindowedView {
            params: WindowParams::new(7, 7).unwrap(),
            rows,
        }
    }

    #[test]
    fn averages_per_weekday_and_ticker() {
        let rows = vec![
            row("BTC", 1, Some(dec!(2))),
            row("BTC", 8, Some(dec!(4))),
            row("ETH", 1, Some(dec!(-1))),
        ];
        let out = weekday_seasonality(&view(rows));

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].weekday, DayOfWeek::Monday);
        assert_eq!(out[0].ticker, "BTC");
        assert_eq!(out[0].avg_daily_pct_change, Some(dec!(3)));
        assert_eq!(out[1].ticker, "ETH");
        assert_eq!(out[1].avg_daily_pct_change, Some(dec!(-1)));
    }

    #[test]
    fn orders_monday_to_sunday_regardless_of_input_order() {
        let rows = vec![
            row("BTC", 0, Some(dec!(1))), // Sunday
            row("BTC", 3, Some(dec!(1))), // Wednesday
            row("BTC", 1, Some(dec!(1))), // Monday
        ];
        let weekdays: Vec<_> = weekday_seasonality(&view(rows)).iter().map(|r| r.weekday).collect();

        assert_eq!(weekdays, vec![DayOfWeek::Monday, DayOfWeek::Wednesday, DayOfWeek::Sunday]);
    }

    #[test]
    fn groups_without_defined_changes_have_no_average() {
        let rows = vec![row("BTC", 1, None), row("BTC", 2, Some(dec!(5)))];
        let out = weekday_seasonality(&view(rows));

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].avg_daily_pct_change, None);
        assert_eq!(out[1].avg_daily_pct_change, Some(dec!(5)));
    }

    #[test]
    fn one_row_per_pair_present() {
        let rows: Vec<_> = (0..28)
            .flat_map(|d| [row("BTC", d, Some(dec!(1))), row("ETH", d, Some(dec!(1)))])
            .collect();
        assert_eq!(weekday_seasonality(&view(rows)).len(), 14);
    }
}
