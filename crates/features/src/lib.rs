//! # Feature Engineering
//!
//! Turns raw per-ticker daily OHLC records into the engineered table every view of
//! the dashboard is built from: daily change, daily % change, price range, average
//! price, 7-day moving average and 7-day volatility.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** Pure computation over `core-types`. No file or UI knowledge.
//! - **No silent zeros:** Values inside a rolling window's warm-up are `None`.
//!
//! The `rolling` module holds the trailing-window primitives; the analytics crate
//! reuses them for the user-sized windows.

pub mod engine;
pub mod rolling;

pub use engine::FeatureEngine;
