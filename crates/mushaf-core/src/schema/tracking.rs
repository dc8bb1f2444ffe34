use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use crate::error::Result;
use crate::model::{ReadingProgress, VerseKey, VerseView};

use super::db::{format_timestamp, parse_timestamp, Database};

// Verse view tracking
impl Database {
    /// Record that a verse has been viewed. Returns `false` when it had
    /// already been recorded.
    pub fn insert_verse_view(&self, key: VerseKey, viewed_at: &DateTime<Utc>) -> Result<bool> {
        let inserted = self.conn().execute(
            "INSERT OR IGNORE INTO verse_views (chapter_number, verse_number, viewed_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![key.chapter, key.verse, format_timestamp(viewed_at)],
        )?;
        Ok(inserted > 0)
    }

    /// Number of distinct verses viewed in a chapter.
    pub fn count_viewed_verses(&self, chapter: u16) -> Result<u32> {
        let count: u32 = self.conn().query_row(
            "SELECT COUNT(*) FROM verse_views WHERE chapter_number = ?1",
            [chapter],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn list_verse_views(&self, chapter: u16) -> Result<Vec<VerseView>> {
        let mut stmt = self.conn().prepare(
            "SELECT chapter_number, verse_number, viewed_at
             FROM verse_views
             WHERE chapter_number = ?1
             ORDER BY verse_number",
        )?;
        let views = stmt
            .query_map([chapter], |row| {
                let viewed_at: String = row.get(2)?;
                Ok(VerseView {
                    key: VerseKey::new(row.get(0)?, row.get(1)?),
                    viewed_at: parse_timestamp(2, &viewed_at)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(views)
    }
}

// Reading progress CRUD
impl Database {
    /// Insert or update the progress record for a chapter.
    pub fn upsert_reading_progress(&self, progress: &ReadingProgress) -> Result<()> {
        self.conn().execute(
            "INSERT INTO reading_progress (chapter_number, chapter_name, percentage, last_read_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(chapter_number) DO UPDATE SET
                chapter_name = excluded.chapter_name,
                percentage = excluded.percentage,
                last_read_at = excluded.last_read_at",
            rusqlite::params![
                progress.chapter,
                progress.chapter_name,
                progress.percentage,
                format_timestamp(&progress.last_read_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_reading_progress(&self, chapter: u16) -> Result<Option<ReadingProgress>> {
        let progress = self
            .conn()
            .query_row(
                "SELECT chapter_number, chapter_name, percentage, last_read_at
                 FROM reading_progress
                 WHERE chapter_number = ?1",
                [chapter],
                row_to_progress,
            )
            .optional()?;
        Ok(progress)
    }

    /// All progress records in chapter order.
    pub fn list_reading_progress(&self) -> Result<Vec<ReadingProgress>> {
        let mut stmt = self.conn().prepare(
            "SELECT chapter_number, chapter_name, percentage, last_read_at
             FROM reading_progress
             ORDER BY chapter_number",
        )?;
        let progress = stmt
            .query_map([], row_to_progress)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(progress)
    }

    /// Remove all progress and view history. Returns the number of
    /// progress records removed.
    pub fn clear_reading_progress(&self) -> Result<usize> {
        let tx = self.conn().unchecked_transaction()?;
        tx.execute("DELETE FROM verse_views", [])?;
        let removed = tx.execute("DELETE FROM reading_progress", [])?;
        tx.commit()?;
        Ok(removed)
    }
}

fn row_to_progress(row: &rusqlite::Row) -> rusqlite::Result<ReadingProgress> {
    let last_read_at: String = row.get(3)?;
    Ok(ReadingProgress {
        chapter: row.get(0)?,
        chapter_name: row.get(1)?,
        percentage: row.get(2)?,
        last_read_at: parse_timestamp(3, &last_read_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_view_is_recorded_once() {
        let db = Database::open_in_memory().unwrap();
        let key = VerseKey::new(1, 1);
        assert!(db.insert_verse_view(key, &Utc::now()).unwrap());
        assert!(!db.insert_verse_view(key, &Utc::now()).unwrap());
        db.insert_verse_view(VerseKey::new(1, 2), &Utc::now()).unwrap();
        db.insert_verse_view(VerseKey::new(2, 1), &Utc::now()).unwrap();

        assert_eq!(db.count_viewed_verses(1).unwrap(), 2);
        assert_eq!(db.list_verse_views(2).unwrap().len(), 1);
    }

    #[test]
    fn test_progress_upsert_keeps_one_row() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_reading_progress(&ReadingProgress::new(36, "Ya-Sin", 10.0))
            .unwrap();
        db.upsert_reading_progress(&ReadingProgress::new(36, "Ya-Sin", 55.5))
            .unwrap();

        let all = db.list_reading_progress().unwrap();
        assert_eq!(all.len(), 1);
        assert!((all[0].percentage - 55.5).abs() < f64::EPSILON);
        assert!(db.get_reading_progress(1).unwrap().is_none());
    }

    #[test]
    fn test_clear_progress() {
        let db = Database::open_in_memory().unwrap();
        db.insert_verse_view(VerseKey::new(36, 1), &Utc::now()).unwrap();
        db.upsert_reading_progress(&ReadingProgress::new(36, "Ya-Sin", 1.0))
            .unwrap();

        assert_eq!(db.clear_reading_progress().unwrap(), 1);
        assert_eq!(db.count_viewed_verses(36).unwrap(), 0);
        assert!(db.list_reading_progress().unwrap().is_empty());
    }
}
