use crate::codec::read_dataset;
use crate::error::DataSourceError;
use core_types::Dataset;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Where a dataset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOrigin {
    File(PathBuf),
    Upload,
}

/// A parsed dataset together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub origin: DataOrigin,
    pub dataset: Dataset,
}

/// Resolves a dataset from an ordered list of candidate locations.
#[derive(Debug, Clone)]
pub struct DataSource {
    candidates: Vec<PathBuf>,
}

impl DataSource {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Returns the first candidate that exists as a file.
    pub fn resolve(&self) -> Result<PathBuf, DataSourceError> {
        for candidate in &self.candidates {
            if candidate.is_file() {
                tracing::info!(path = %candidate.display(), "Resolved dataset location.");
                return Ok(candidate.clone());
            }
            tracing::debug!(path = %candidate.display(), "Candidate dataset not found.");
        }

        Err(DataSourceError::NotFound {
            candidates: self.candidates.clone(),
        })
    }

    /// Resolves the first existing candidate and parses it.
    pub fn load(&self) -> Result<LoadedDataset, DataSourceError> {
        let path = self.resolve()?;
        let dataset = load_path(&path)?;
        Ok(LoadedDataset {
            origin: DataOrigin::File(path),
            dataset,
        })
    }
}

/// Parses the dataset file at `path`.
pub fn load_path(path: &Path) -> Result<Dataset, DataSourceError> {
    let file = File::open(path)?;
    let dataset = read_dataset(BufReader::new(file))?;
    tracing::info!(
        path = %path.display(),
        rows = dataset.len(),
        pre_featured = dataset.has_features(),
        "Loaded dataset."
    );
    Ok(dataset)
}

/// Parses an ad-hoc upload with the same schema as a dataset file.
pub fn load_upload<R: Read>(reader: R) -> Result<LoadedDataset, DataSourceError> {
    let dataset = read_dataset(reader)?;
    tracing::info!(rows = dataset.len(), "Loaded uploaded dataset.");
    Ok(LoadedDataset {
        origin: DataOrigin::Upload,
        dataset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CSV: &str = "Date,Ticker,Open,High,Low,Close\n2024-01-01,BTC,1,2,1,2\n";

    #[test]
    fn resolves_first_existing_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("second.csv");
        let third = dir.path().join("third.csv");
        fs::write(&second, CSV).unwrap();
        fs::write(&third, CSV).unwrap();

        let source = DataSource::new(vec![dir.path().join("first.csv"), second.clone(), third]);
        assert_eq!(source.resolve().unwrap(), second);

        let loaded = source.load().unwrap();
        assert_eq!(loaded.origin, DataOrigin::File(second));
        assert_eq!(loaded.dataset.len(), 1);
    }

    #[test]
    fn directories_are_not_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::new(vec![dir.path().to_path_buf()]);
        assert!(matches!(source.resolve(), Err(DataSourceError::NotFound { .. })));
    }

    #[test]
    fn reports_all_candidates_when_none_exist() {
        let source = DataSource::new(vec![PathBuf::from("/nonexistent/a.csv"), PathBuf::from("b.missing")]);
        match source.load() {
            Err(DataSourceError::NotFound { candidates }) => assert_eq!(candidates.len(), 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn uploads_use_the_same_schema() {
        let loaded = load_upload(CSV.as_bytes()).unwrap();
        assert_eq!(loaded.origin, DataOrigin::Upload);

        let bad = load_upload("Ticker,Close\nBTC,1\n".as_bytes());
        assert!(matches!(bad, Err(DataSourceError::SchemaError { .. })));
    }
}
