use crate::error::DataSourceError;
use crate::source::{load_path, DataOrigin, LoadedDataset};
use crate::table::EngineeredTable;
use features::FeatureEngine;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

struct CacheEntry {
    modified: SystemTime,
    table: Arc<EngineeredTable>,
}

/// Memoizes engineered tables by source file.
///
/// An entry is keyed by the canonical path and is valid for the file's modification
/// time it was loaded at; a newer file on disk is reloaded. There is no eviction.
pub struct DatasetCache {
    engine: FeatureEngine,
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    pub fn new(engine: FeatureEngine) -> Self {
        Self {
            engine,
            entries: HashMap::new(),
        }
    }

    /// Returns the engineered table for `path`, loading and deriving it if it is
    /// not cached or the file changed since it was cached.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<EngineeredTable>, DataSourceError> {
        let key = fs::canonicalize(path)?;
        let modified = fs::metadata(&key)?.modified()?;

        if let Some(entry) = self.entries.get(&key) {
            if entry.modified == modified {
                tracing::debug!(path = %key.display(), "Dataset cache hit.");
                return Ok(Arc::clone(&entry.table));
            }
            tracing::info!(path = %key.display(), "Dataset changed on disk; reloading.");
        }

        let loaded = LoadedDataset {
            origin: DataOrigin::File(path.to_path_buf()),
            dataset: load_path(&key)?,
        };
        let table = Arc::new(EngineeredTable::build(loaded, &self.engine));

        self.entries.insert(
            key,
            CacheEntry {
                modified,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drops the entry for `path`. Returns whether one was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(FeatureEngine::new())
    }
}
