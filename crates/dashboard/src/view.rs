use crate::error::DashboardError;
use crate::state::DashboardState;
use analytics::{
    filter_records, return_histogram, weekday_seasonality, AnalyticsEngine, ReturnHistogram, SeasonalityRow,
    TickerKpis, WindowedRow, WindowedView,
};
use chrono::NaiveDate;
use configuration::DashboardConfig;
use data_source::{DataOrigin, EngineeredTable};
use rust_decimal::Decimal;
use serde::Serialize;

pub const EMPTY_SELECTION_WARNING: &str = "Please select at least one ticker.";
pub const NO_ROWS_WARNING: &str = "No data for the selected tickers and date range.";

/// One chart point; `value` is `None` where the series is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub date: NaiveDate,
    pub value: Option<Decimal>,
}

/// A per-ticker line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub ticker: String,
    pub label: String,
    pub points: Vec<Point>,
}

impl Series {
    fn from_view(
        view: &WindowedView,
        ticker: &str,
        label: impl Into<String>,
        value: impl Fn(&WindowedRow) -> Option<Decimal>,
    ) -> Self {
        Self {
            ticker: ticker.to_string(),
            label: label.into(),
            points: view
                .rows_for(ticker)
                .map(|row| Point {
                    date: row.record.date(),
                    value: value(row),
                })
                .collect(),
        }
    }
}

/// Drawdown lines together with their zero reference line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownChart {
    pub baseline: Decimal,
    pub series: Vec<Series>,
}

/// Everything the presentation layer draws for one dashboard state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Latest date in the data; only set when the data came from a file.
    pub last_updated: Option<NaiveDate>,
    pub state: DashboardState,
    pub warning: Option<String>,
    pub kpis: Vec<TickerKpis>,
    pub price: Vec<Series>,
    /// The dynamic moving average; only drawn for a single selected ticker.
    pub moving_average: Option<Series>,
    pub volatility: Vec<Series>,
    pub returns_histogram: ReturnHistogram,
    pub drawdown: DrawdownChart,
    pub seasonality: Vec<SeasonalityRow>,
}

impl DashboardView {
    pub fn last_updated_banner(&self) -> Option<String> {
        self.last_updated
            .map(|date| format!("Data last updated on: {}", date.format("%Y-%m-%d")))
    }
}

/// Turns a dashboard state into a view over an engineered table.
///
/// Rendering is a pure function of the table and the state: nothing is cached and
/// the windowed series are recomputed on every call.
#[derive(Debug, Clone)]
pub struct Dashboard {
    bins: usize,
}

impl Dashboard {
    pub fn new(bins: usize) -> Self {
        Self { bins }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.histogram.bins)
    }

    /// Filters the table to the state's selection and computes the windowed series.
    pub fn window(&self, table: &EngineeredTable, state: &DashboardState) -> Result<WindowedView, DashboardError> {
        let params = state.window_params()?;
        let range = state.date_range()?;

        let filtered = filter_records(&table.records, &state.tickers, range);
        Ok(AnalyticsEngine::new(params).compute(filtered))
    }

    pub fn render(&self, table: &EngineeredTable, state: &DashboardState) -> Result<DashboardView, DashboardError> {
        // 1. Filter and window
        let view = self.window(table, state)?;
        let ma_label = format!("{}d MA", view.params.ma_window());
        let vol_label = format!("{}d volatility", view.params.vol_window());

        let warning = if state.tickers.is_empty() {
            tracing::warn!("Empty ticker selection.");
            Some(EMPTY_SELECTION_WARNING.to_string())
        } else if view.is_empty() {
            tracing::warn!(tickers = ?state.tickers, "Selection has no rows.");
            Some(NO_ROWS_WARNING.to_string())
        } else {
            None
        };

        // 2. Headline figures
        let kpis = AnalyticsEngine::new(view.params).kpis(&view, &state.tickers);

        // 3. Charts
        let tickers = view.tickers();
        let price = tickers
            .iter()
            .map(|t| Series::from_view(&view, t, "Close", |r| Some(r.record.close())))
            .collect();
        let moving_average = match (state.tickers.as_slice(), view.is_empty()) {
            ([ticker], false) => Some(Series::from_view(&view, ticker, ma_label, |r| r.dynamic_ma)),
            _ => None,
        };
        let volatility = tickers
            .iter()
            .map(|t| Series::from_view(&view, t, vol_label.clone(), |r| r.dynamic_volatility))
            .collect();
        let drawdown = DrawdownChart {
            baseline: Decimal::ZERO,
            series: tickers
                .iter()
                .map(|t| Series::from_view(&view, t, "Drawdown", |r| r.drawdown))
                .collect(),
        };

        let last_updated = match table.origin {
            DataOrigin::File(_) => table.last_updated,
            DataOrigin::Upload => None,
        };

        tracing::debug!(rows = view.rows.len(), tickers = tickers.len(), "Rendered dashboard view.");

        Ok(DashboardView {
            last_updated,
            state: state.clone(),
            warning,
            kpis,
            price,
            moving_average,
            volatility,
            returns_histogram: return_histogram(&view, self.bins),
            drawdown,
            seasonality: weekday_seasonality(&view),
        })
    }
}
