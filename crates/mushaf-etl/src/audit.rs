use std::path::PathBuf;
use treadle::{Stage, StageContext, StageOutcome};

use mushaf_core::schema::Database;

use crate::normalize::incomplete_chapters;

/// The Audit stage: read the stored content back and record which chapters
/// are missing verses.
///
/// Incomplete chapters are reported, not treated as failures; a partial
/// dataset is still readable.
#[derive(Debug)]
pub struct AuditStage {
    db_path: PathBuf,
}

impl AuditStage {
    #[must_use]
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

#[async_trait::async_trait]
impl Stage for AuditStage {
    fn name(&self) -> &str {
        "audit"
    }

    async fn execute(
        &self,
        _item: &dyn treadle::WorkItem,
        ctx: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        let db = Database::open(&self.db_path).map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Failed to open database: {e}"))
        })?;

        let chapters = db.load_chapters().map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Failed to load chapters: {e}"))
        })?;
        let incomplete = incomplete_chapters(&chapters);

        ctx.metadata.insert(
            "incomplete_chapters".to_string(),
            serde_json::Value::from(incomplete.clone()),
        );

        if incomplete.is_empty() {
            log::info!("Audit complete: all {} chapters loaded", chapters.len());
        } else {
            log::warn!(
                "Audit complete: {} of {} chapters incomplete",
                incomplete.len(),
                chapters.len()
            );
        }
        Ok(StageOutcome::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mushaf_core::model::{Chapter, Verse, VerseKey};
    use mushaf_core::CHAPTERS;

    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    struct TestItem {
        id: String,
    }

    impl treadle::WorkItem for TestItem {
        fn id(&self) -> &str {
            &self.id
        }
    }

    #[tokio::test]
    async fn test_audit_reports_incomplete_chapters() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("mushaf.db");
        let db = Database::open(&db_path).unwrap();

        let chapters: Vec<Chapter> = CHAPTERS
            .iter()
            .map(|meta| {
                let verses = (1..=meta.verse_count)
                    .filter(|&v| !(meta.number == 2 && v == 255))
                    .map(|v| Verse::new(VerseKey::new(meta.number, v), "t", "o"))
                    .collect();
                Chapter::from_meta(meta).with_verses(verses)
            })
            .collect();
        db.replace_content(&chapters).unwrap();

        let stage = AuditStage::new(db_path);
        let item = TestItem {
            id: "dataset".to_string(),
        };
        let mut ctx = StageContext::new("audit".to_string());
        let outcome = stage.execute(&item, &mut ctx).await.unwrap();

        assert_eq!(outcome, StageOutcome::Complete);
        let incomplete: Vec<u16> =
            serde_json::from_value(ctx.metadata.get("incomplete_chapters").unwrap().clone())
                .unwrap();
        assert_eq!(incomplete, vec![2]);
    }
}
