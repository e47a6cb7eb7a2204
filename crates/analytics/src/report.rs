use crate::view::WindowedRow;
use features::rolling::percent_of;
use rust_decimal::Decimal;
use serde::Serialize;

/// Headline figures for one ticker over the windowed view.
///
/// The `Option` fields are `None` when the underlying value is undefined, e.g. a
/// daily change on the first day of data or a volatility inside its warm-up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerKpis {
    pub ticker: String,
    /// Close of the last row in the view.
    pub current_price: Decimal,
    /// `Daily % change` of the last row in the view.
    pub daily_pct_change: Option<Decimal>,
    /// `(last close - first close) / first close * 100` over the view.
    pub period_pct_change: Option<Decimal>,
    /// Dynamic volatility of the last row in the view.
    pub volatility: Option<Decimal>,
    /// The deepest drawdown in the view (the minimum, so `<= 0`).
    pub max_drawdown: Option<Decimal>,
    pub observations: usize,
}

impl TickerKpis {
    /// Builds the KPIs from one ticker's date-ordered rows, or `None` if there are none.
    pub fn from_rows(ticker: &str, rows: &[&WindowedRow]) -> Option<Self> {
        let first = rows.first()?;
        let last = rows.last()?;

        let start_price = first.record.close();
        let end_price = last.record.close();

        let max_drawdown = rows.iter().filter_map(|r| r.drawdown).min();

        Some(Self {
            ticker: ticker.to_string(),
            current_price: end_price,
            daily_pct_change: last.record.features.daily_pct_change,
            period_pct_change: percent_of(end_price - start_price, start_price),
            volatility: last.dynamic_volatility,
            max_drawdown,
            observations: rows.len(),
        })
    }
}
