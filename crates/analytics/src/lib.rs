//! # Analytics
//!
//! Restricts the engineered table to the user's selection and derives everything
//! that depends on the chosen window sizes.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It depends only on `core-types`
//!   and the rolling primitives of `features`.
//! - **Stateless Calculation:** Every call recomputes from its inputs. There is no
//!   incremental update path and nothing is cached here.
//! - **Undefined stays undefined:** Windows that are not yet full and divisions by
//!   zero produce `None`, which the presentation layer treats as "no data point".
//!
//! ## Public API
//!
//! - `filter_records` / `DateRange`: the ticker and date restriction.
//! - `AnalyticsEngine`: dynamic MA, dynamic volatility, running max, drawdown, KPIs.
//! - `weekday_seasonality`: average daily % change per (weekday, ticker).
//! - `return_histogram`: the daily-return distribution on a shared bin grid.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod report;
pub mod seasonality;
pub mod view;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use filter::{filter_records, DateRange};
pub use histogram::{return_histogram, HistogramSeries, ReturnHistogram};
pub use report::TickerKpis;
pub use seasonality::{weekday_seasonality, SeasonalityRow};
pub use view::{WindowParams, WindowedRow, WindowedView};
