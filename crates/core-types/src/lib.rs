//! # Core Types
//!
//! The shared vocabulary of the dashboard: daily OHLC records as they come out of a
//! dataset, the engineered records the feature pipeline produces, and the small
//! enums used to group and order them.
//!
//! This crate is Layer 0. It has no knowledge of files, configuration, or rendering.

// Declare the modules that constitute this crate.
pub mod constants;
pub mod dataset;
pub mod enums;
pub mod error;
pub mod records;

// Re-export the core types to provide a clean public API.
pub use constants::{FEATURE_WINDOW, MAX_WINDOW, MIN_WINDOW, ROUND_DP};
pub use dataset::Dataset;
pub use enums::DayOfWeek;
pub use error::CoreError;
pub use records::{DailyRecord, EngineeredRecord, Features};
