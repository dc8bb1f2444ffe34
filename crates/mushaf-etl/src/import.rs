use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use treadle::{Stage, StageContext, StageOutcome};

use mushaf_core::schema::Database;
use mushaf_core::CHAPTERS;

use crate::error::EtlResult;
use crate::loader::load_dataset;
use crate::normalize::{incomplete_chapters, normalize};
use crate::words::{apply_word_alignment, WordAlignment};

/// Summary of one dataset import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Records accepted by the loader.
    pub records: usize,
    pub chapters: usize,
    pub verses: usize,
    pub words: usize,
    /// Verses that received a word-by-word breakdown.
    pub aligned_verses: usize,
    /// Chapters whose verse count differs from the reference table.
    pub incomplete_chapters: Vec<u16>,
}

/// Load, normalize, and store a dataset, replacing the current content.
///
/// Favorites, notes, memorization, and progress are untouched.
pub fn import_dataset(
    db: &Database,
    dataset: &Path,
    words: Option<&Path>,
) -> EtlResult<ImportReport> {
    let records = load_dataset(dataset)?;
    let mut chapters = normalize(&records, &CHAPTERS);

    let aligned_verses = match words {
        Some(path) => {
            let alignment = WordAlignment::load(path)?;
            apply_word_alignment(&mut chapters, &alignment)
        }
        None => 0,
    };

    let counts = db.replace_content(&chapters)?;
    let report = ImportReport {
        records: records.len(),
        chapters: counts.chapters,
        verses: counts.verses,
        words: counts.words,
        aligned_verses,
        incomplete_chapters: incomplete_chapters(&chapters),
    };

    if !report.incomplete_chapters.is_empty() {
        log::warn!(
            "{} chapters are incomplete after import",
            report.incomplete_chapters.len()
        );
    }
    Ok(report)
}

/// The Import stage: load the dataset and replace the content tables.
#[derive(Debug)]
pub struct ImportStage {
    dataset: PathBuf,
    words: Option<PathBuf>,
    db_path: PathBuf,
}

impl ImportStage {
    #[must_use]
    pub fn new(dataset: PathBuf, words: Option<PathBuf>, db_path: PathBuf) -> Self {
        Self {
            dataset,
            words,
            db_path,
        }
    }
}

#[async_trait::async_trait]
impl Stage for ImportStage {
    fn name(&self) -> &str {
        "import"
    }

    async fn execute(
        &self,
        _item: &dyn treadle::WorkItem,
        ctx: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        log::info!("Starting import of {}", self.dataset.display());

        let db = Database::open(&self.db_path).map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Failed to open database: {e}"))
        })?;

        let report = import_dataset(&db, &self.dataset, self.words.as_deref())
            .map_err(|e| treadle::TreadleError::StageExecution(format!("Import failed: {e}")))?;

        let report_json = serde_json::to_value(&report).map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Failed to serialize report: {e}"))
        })?;
        ctx.metadata.insert("import_report".to_string(), report_json);

        log::info!(
            "Import complete: {} verses in {} chapters",
            report.verses,
            report.chapters
        );
        Ok(StageOutcome::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mushaf_core::model::{FavoriteVerse, VerseKey};
    use tempfile::TempDir;

    const DATASET: &str = concat!(
        "id,sura,aya,translation,footnotes\n",
        "1,1,1,\"In the name of Allah, the Most Gracious, the Most Merciful\",\"\"\n",
        "2,1,2,\"All praise is for Allah, Lord of all worlds\",\"\"\n",
    );

    #[test]
    fn test_import_dataset_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quran.csv");
        std::fs::write(&path, DATASET).unwrap();

        let db = Database::open_in_memory().unwrap();
        let report = import_dataset(&db, &path, None).unwrap();

        assert_eq!(report.records, 2);
        assert_eq!(report.chapters, 114);
        assert_eq!(report.verses, 2);
        assert_eq!(report.words, 2);
        assert_eq!(report.aligned_verses, 0);
        assert_eq!(report.incomplete_chapters.len(), 114);
    }

    #[test]
    fn test_reimport_keeps_annotations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quran.csv");
        std::fs::write(&path, DATASET).unwrap();

        let db = Database::open_in_memory().unwrap();
        import_dataset(&db, &path, None).unwrap();
        db.add_favorite(&FavoriteVerse::new(VerseKey::new(1, 1), "بِسْمِ", "In the name"))
            .unwrap();

        import_dataset(&db, &path, None).unwrap();
        assert!(db.is_favorite(VerseKey::new(1, 1)).unwrap());
        assert_eq!(db.count_verses().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_import_stage_records_report() {
        let dir = TempDir::new().unwrap();
        let dataset = dir.path().join("quran.csv");
        let db_path = dir.path().join("mushaf.db");
        std::fs::write(&dataset, DATASET).unwrap();

        let stage = ImportStage::new(dataset, None, db_path.clone());

        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        struct TestItem {
            id: String,
        }

        impl treadle::WorkItem for TestItem {
            fn id(&self) -> &str {
                &self.id
            }
        }

        let item = TestItem {
            id: "dataset".to_string(),
        };
        let mut ctx = StageContext::new("import".to_string());

        let outcome = stage.execute(&item, &mut ctx).await.unwrap();
        assert_eq!(outcome, StageOutcome::Complete);

        let report: ImportReport =
            serde_json::from_value(ctx.metadata.get("import_report").unwrap().clone()).unwrap();
        assert_eq!(report.verses, 2);

        let db = Database::open(&db_path).unwrap();
        assert_eq!(db.load_chapter(1).unwrap().unwrap().verses.len(), 2);
    }
}
