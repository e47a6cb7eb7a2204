use crate::report::TickerKpis;
use crate::view::{WindowParams, WindowedRow, WindowedView};
use core_types::EngineeredRecord;
use features::rolling::{pct_change, percent_of, rolling_mean, rolling_std, running_max};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A stateless calculator for the window-dependent series and per-ticker KPIs.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    params: WindowParams,
}

impl AnalyticsEngine {
    pub fn new(params: WindowParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> WindowParams {
        self.params
    }

    /// Computes the dynamic moving average, dynamic volatility, running maximum and
    /// drawdown for a filtered, date-ordered view.
    ///
    /// Each ticker is computed independently over its own rows. The output keeps
    /// the input row order.
    pub fn compute(&self, filtered: Vec<EngineeredRecord>) -> WindowedView {
        let mut positions: Vec<(String, Vec<usize>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (i, record) in filtered.iter().enumerate() {
            let slot = *index.entry(record.ticker().to_string()).or_insert_with(|| {
                positions.push((record.ticker().to_string(), Vec::new()));
                positions.len() - 1
            });
            positions[slot].1.push(i);
        }

        let mut dynamic_ma = vec![None; filtered.len()];
        let mut dynamic_volatility = vec![None; filtered.len()];
        let mut peaks = vec![None; filtered.len()];
        let mut drawdowns = vec![None; filtered.len()];

        for (ticker, rows) in &positions {
            let closes: Vec<Option<Decimal>> = rows.iter().map(|&i| Some(filtered[i].close())).collect();

            let ma = rolling_mean(&closes, self.params.ma_window());
            let volatility = rolling_std(&pct_change(&closes), self.params.vol_window());
            let peak = running_max(&closes);

            for (k, &i) in rows.iter().enumerate() {
                dynamic_ma[i] = ma[k];
                dynamic_volatility[i] = volatility[k];
                peaks[i] = peak[k];
                drawdowns[i] = match (closes[k], peak[k]) {
                    (Some(close), Some(peak)) => drawdown(close, peak),
                    _ => None,
                };
            }

            tracing::debug!(ticker = %ticker, rows = rows.len(), "Computed windowed series.");
        }

        let rows = filtered
            .into_iter()
            .enumerate()
            .map(|(i, record)| WindowedRow {
                record,
                dynamic_ma: dynamic_ma[i],
                dynamic_volatility: dynamic_volatility[i],
                running_max: peaks[i],
                drawdown: drawdowns[i],
            })
            .collect();

        WindowedView {
            params: self.params,
            rows,
        }
    }

    /// Computes the KPIs for each selected ticker, in selection order.
    ///
    /// Tickers with no rows in the view are skipped.
    pub fn kpis(&self, view: &WindowedView, selected: &[String]) -> Vec<TickerKpis> {
        selected
            .iter()
            .filter_map(|ticker| {
                let rows: Vec<&WindowedRow> = view.rows_for(ticker).collect();
                TickerKpis::from_rows(ticker, &rows)
            })
            .collect()
    }
}

/// `(close - peak) / peak * 100`; undefined for a zero peak.
fn drawdown(close: Decimal, peak: Decimal) -> Option<Decimal> {
    percent_of(close - peak, peak)
}
