use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use treadle::WorkItem;

/// A dataset file being imported.
///
/// This is the treadle `WorkItem` that flows through the import → audit
/// stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Stable ID for this work item, derived from the dataset path.
    id: String,
    /// Path to the CSV or JSON dataset.
    pub path: PathBuf,
}

impl Dataset {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            id: format!("dataset:{}", path.display()),
            path,
        }
    }

    /// A dataset import tagged with a run identifier, so repeated imports of
    /// the same file are tracked separately.
    #[must_use]
    pub fn for_run(path: PathBuf, run: &str) -> Self {
        Self {
            id: format!("dataset:{}#{run}", path.display()),
            path,
        }
    }
}

impl WorkItem for Dataset {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_id_follows_path() {
        let dataset = Dataset::new(PathBuf::from("/data/quran.csv"));
        assert_eq!(dataset.id(), "dataset:/data/quran.csv");
        assert_eq!(dataset.to_string(), "/data/quran.csv");
        assert_eq!(
            Dataset::new(PathBuf::from("/data/quran.csv")).id(),
            dataset.id()
        );
    }

    #[test]
    fn test_runs_are_distinct_items() {
        let path = PathBuf::from("/data/quran.csv");
        let first = Dataset::for_run(path.clone(), "1");
        let second = Dataset::for_run(path, "2");
        assert_ne!(first.id(), second.id());
        assert_eq!(first.to_string(), second.to_string());
    }
}
