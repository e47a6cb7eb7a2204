use crate::view::DashboardView;
use analytics::TickerKpis;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use rust_decimal::Decimal;

/// How the headline figures are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiLayout {
    /// Four figures for the one selected ticker.
    Single,
    /// One row per ticker, with the volatility column named after its window.
    Comparison { vol_window: usize },
}

impl KpiLayout {
    pub fn for_view(view: &DashboardView) -> Self {
        if view.state.tickers.len() == 1 {
            Self::Single
        } else {
            Self::Comparison {
                vol_window: view.state.vol_window,
            }
        }
    }
}

/// Builds the KPI table for the given layout.
pub fn kpi_table(kpis: &[TickerKpis], layout: KpiLayout) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    match layout {
        KpiLayout::Single => {
            table.set_header(vec!["Current Price", "Daily Change", "Period Change", "Max Drawdown"]);
            for kpi in kpis {
                table.add_row(vec![
                    format_price(kpi.current_price),
                    format_percent(kpi.daily_pct_change),
                    format_percent(kpi.period_pct_change),
                    format_percent(kpi.max_drawdown),
                ]);
            }
        }
        KpiLayout::Comparison { vol_window } => {
            table.set_header(vec![
                "Ticker".to_string(),
                "Price".to_string(),
                format!("{vol_window}d Vol"),
                "Daily %".to_string(),
                "Max DD".to_string(),
            ]);
            for kpi in kpis {
                table.add_row(vec![
                    kpi.ticker.clone(),
                    format_price(kpi.current_price),
                    format_percent(kpi.volatility),
                    format_percent(kpi.daily_pct_change),
                    format_percent(kpi.max_drawdown),
                ]);
            }
        }
    }

    table
}

/// The text shown by the `summary` command: the last-updated stamp, any
/// warning, and the KPI table.
pub fn render_summary(view: &DashboardView) -> String {
    let mut lines = Vec::new();
    if let Some(banner) = view.last_updated_banner() {
        lines.push(banner);
    }
    if let Some(warning) = &view.warning {
        lines.push(format!("Warning: {warning}"));
    }
    if !view.kpis.is_empty() {
        lines.push(kpi_table(&view.kpis, KpiLayout::for_view(view)).to_string());
    }
    lines.join("\n")
}

/// `$1,234.56`
pub fn format_price(value: Decimal) -> String {
    let fixed = format!("{:.2}", value.round_dp(2));
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{fraction}")
}

/// `12.34%`, or `n/a` when undefined.
pub fn format_percent(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v.round_dp(2)),
        None => "n/a".to_string(),
    }
}
