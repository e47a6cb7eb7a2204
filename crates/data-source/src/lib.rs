//! # Data Source
//!
//! This crate is the dashboard's only contact with the file system. It finds the
//! dataset among a list of candidate locations, parses it, and memoizes the
//! engineered table per source file.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** Encapsulates the CSV format and file handling behind a small API.
//!   Everything downstream works on `core-types` records.
//! - **Capability check, not fallback:** A dataset either exposes the derived columns
//!   or it does not; `Dataset::Featured` vs `Dataset::Raw` records which.
//!
//! ## Public API
//!
//! - `DataSource`: resolves and loads the first existing candidate.
//! - `load_upload`: parses an ad-hoc upload with the same schema.
//! - `DatasetCache`: memoized `EngineeredTable`s keyed by path and modification time.
//! - `codec`: the CSV reader/writer and the column names.
//! - `DataSourceError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod cache;
pub mod codec;
pub mod error;
pub mod source;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use cache::DatasetCache;
pub use error::DataSourceError;
pub use source::{load_path, load_upload, DataOrigin, DataSource, LoadedDataset};
pub use table::EngineeredTable;
