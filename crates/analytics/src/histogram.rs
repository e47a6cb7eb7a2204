use crate::view::WindowedView;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

/// Distribution of daily % changes, binned on a grid shared by all tickers so the
/// per-ticker counts can be overlaid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnHistogram {
    /// `bins + 1` ascending bin edges. Empty when the view has no defined change.
    pub edges: Vec<Decimal>,
    pub series: Vec<HistogramSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub ticker: String,
    pub counts: Vec<usize>,
}

/// Bins the defined `Daily % change` values of the view into `bins` equal-width bins
/// between the overall minimum and maximum.
///
/// The last bin is closed on both ends. If every value is identical a single bin
/// holds them all.
pub fn return_histogram(view: &WindowedView, bins: usize) -> ReturnHistogram {
    let values = || view.rows.iter().filter_map(|r| r.record.features.daily_pct_change);

    let (Some(min), Some(max)) = (values().min(), values().max()) else {
        return ReturnHistogram {
            edges: Vec::new(),
            series: Vec::new(),
        };
    };

    let width = (max - min).checked_div(Decimal::from(bins.max(1)));
    let bins = match width {
        Some(w) if !w.is_zero() => bins.max(1),
        _ => 1,
    };

    let edges: Vec<Decimal> = (0..=bins)
        .map(|i| match width {
            _ if i == bins => max,
            Some(w) => min + w * Decimal::from(i),
            None => min,
        })
        .collect();

    let series = view
        .tickers()
        .into_iter()
        .map(|ticker| {
            let mut counts = vec![0usize; bins];
            for value in view
                .rows_for(ticker)
                .filter_map(|r| r.record.features.daily_pct_change)
            {
                counts[bin_index(value, min, width, bins)] += 1;
            }
            HistogramSeries {
                ticker: ticker.to_string(),
                counts,
            }
        })
        .collect();

    ReturnHistogram { edges, series }
}

fn bin_index(value: Decimal, min: Decimal, width: Option<Decimal>, bins: usize) -> usize {
    let Some(width) = width.filter(|w| !w.is_zero()) else {
        return 0;
    };

    (value - min)
        .checked_div(width)
        .and_then(|q| q.floor().to_usize())
        .map_or(0, |i| i.min(bins - 1))
}
