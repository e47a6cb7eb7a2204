//! # Dashboard
//!
//! The presentation-facing layer. It turns a `DashboardState` (the user's selection)
//! and an engineered table into a `DashboardView`: KPIs plus the data behind every
//! chart. Drawing the charts is left to whatever consumes the serialized view.
//!
//! ## Architectural Principles
//!
//! - **Pure Rendering:** `Dashboard::render` is a function of the table and the state.
//!   Nothing is cached between calls; changing a window re-runs the analytics.
//! - **No Output:** This crate builds strings, tables, and files on request but never
//!   prints. The binary decides where output goes.
//!
//! ## Public API
//!
//! - `DashboardState`: the selection, its defaults, and its validation.
//! - `Dashboard`: renders a `DashboardView` or the bare `WindowedView`.
//! - `summary`: KPI tables and number formatting for the terminal.
//! - `export`: the filtered-view CSV and its file name.

// Declare the modules that constitute this crate.
pub mod error;
pub mod export;
pub mod state;
pub mod summary;
pub mod view;

// Re-export the key components to create a clean, public-facing API.
pub use error::DashboardError;
pub use export::{export_file_name, export_to_dir, write_export};
pub use state::DashboardState;
pub use summary::{kpi_table, render_summary, KpiLayout};
pub use view::{Dashboard, DashboardView, DrawdownChart, Point, Series};
