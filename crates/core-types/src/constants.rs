/// Trailing window used for the fixed `7d ma` and `7d volatility` features.
pub const FEATURE_WINDOW: usize = 7;

/// Decimal places every engineered numeric column is rounded to.
pub const ROUND_DP: u32 = 4;

/// Smallest user-selectable rolling window, in days.
pub const MIN_WINDOW: usize = 7;

/// Largest user-selectable rolling window, in days.
pub const MAX_WINDOW: usize = 100;
