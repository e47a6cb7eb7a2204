use crate::records::{DailyRecord, EngineeredRecord};
use chrono::NaiveDate;

/// A loaded dataset, tagged with whether it already exposes the derived columns.
///
/// A pre-featured file is carried as `Featured` and passes through the feature
/// engine untouched; a raw master file is carried as `Raw` and gets its features
/// derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataset {
    Raw(Vec<DailyRecord>),
    Featured(Vec<EngineeredRecord>),
}

impl Dataset {
    /// Does this dataset already expose the derived feature columns?
    pub fn has_features(&self) -> bool {
        matches!(self, Dataset::Featured(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Dataset::Raw(records) => records.len(),
            Dataset::Featured(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recent date present in the data, used as the "last updated" stamp.
    pub fn last_date(&self) -> Option<NaiveDate> {
        match self {
            Dataset::Raw(records) => records.iter().map(|r| r.date).max(),
            Dataset::Featured(records) => records.iter().map(|r| r.date()).max(),
        }
    }
}
