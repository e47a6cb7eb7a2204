//! Trailing-window primitives over a single ticker's date-ordered series.
//!
//! Every function takes and returns `Option<Decimal>` so that a missing input
//! propagates as a missing output. A window is only evaluated when all of its
//! `period` slots hold a value, which is the "minimum periods = window" rule.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// First difference: `x[t] - x[t-1]`. The first position has no predecessor.
pub fn diff(values: &[Option<Decimal>]) -> Vec<Option<Decimal>> {
    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if i == 0 {
            out.push(None);
            continue;
        }

        match (values[i], values[i - 1]) {
            (Some(current), Some(previous)) => out.push(current.checked_sub(previous)),
            _ => out.push(None),
        }
    }

    out
}

/// Simple relative change in percent: `(x[t] - x[t-1]) / x[t-1] * 100`.
///
/// A zero predecessor yields `None`.
pub fn pct_change(values: &[Option<Decimal>]) -> Vec<Option<Decimal>> {
    let changes = diff(values);

    changes
        .iter()
        .enumerate()
        .map(|(i, change)| {
            let previous = if i == 0 { None } else { values[i - 1] };
            match (change, previous) {
                (Some(change), Some(previous)) => percent_of(*change, previous),
                _ => None,
            }
        })
        .collect()
}

/// Trailing arithmetic mean over `period` points, current point included.
pub fn rolling_mean(values: &[Option<Decimal>], period: usize) -> Vec<Option<Decimal>> {
    let mut sma = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let Some(window) = full_window(values, i, period) else {
            sma.push(None);
            continue;
        };

        let sum: Decimal = window.iter().sum();
        sma.push(sum.checked_div(Decimal::from(period)));
    }

    sma
}

/// Trailing sample standard deviation (n - 1 denominator) over `period` points.
///
/// A window of a single point has no sample deviation and yields `None`.
pub fn rolling_std(values: &[Option<Decimal>], period: usize) -> Vec<Option<Decimal>> {
    let mut std = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let Some(window) = full_window(values, i, period) else {
            std.push(None);
            continue;
        };
        std.push(sample_std(&window));
    }

    std
}

/// Running maximum of the series seen so far. Missing points keep the previous peak
/// but produce no value themselves.
pub fn running_max(values: &[Option<Decimal>]) -> Vec<Option<Decimal>> {
    let mut peak: Option<Decimal> = None;

    values
        .iter()
        .map(|value| {
            let value = (*value)?;
            let current = match peak {
                Some(p) if p >= value => p,
                _ => value,
            };
            peak = Some(current);
            Some(current)
        })
        .collect()
}

/// `change / reference * 100`, or `None` when the reference is zero.
pub fn percent_of(change: Decimal, reference: Decimal) -> Option<Decimal> {
    change
        .checked_div(reference)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Rounds a defined value to `dp` decimal places (round-half-to-even).
pub fn round_opt(value: Option<Decimal>, dp: u32) -> Option<Decimal> {
    value.map(|v| v.round_dp(dp))
}

/// Returns the `period` values ending at `i`, or `None` if the window is short
/// or any slot in it is missing.
fn full_window(values: &[Option<Decimal>], i: usize, period: usize) -> Option<Vec<Decimal>> {
    if period == 0 || i + 1 < period {
        // Not enough data for the window yet
        return None;
    }

    let window_start = i + 1 - period;
    values[window_start..=i].iter().copied().collect()
}

fn sample_std(window: &[Decimal]) -> Option<Decimal> {
    if window.len() < 2 {
        return None;
    }

    let n = Decimal::from(window.len());
    let mean = window.iter().sum::<Decimal>().checked_div(n)?;
    let sum_sq: Decimal = window.iter().map(|x| (*x - mean) * (*x - mean)).sum();
    let variance = sum_sq.checked_div(n - Decimal::ONE)?;

    variance.sqrt()
}
