//! Reading progress.
//!
//! Progress for a chapter is derived from which of its verses have been
//! viewed at least once: `100 * distinct_viewed / expected`, capped at 100.
//! View markers are idempotent and a stored value is never lowered, so
//! progress only grows until it is explicitly cleared.

use chrono::Utc;

use crate::error::{Error, Result};
use crate::model::{ReadingProgress, VerseKey};
use crate::reference::{chapter_meta, ChapterMeta};
use crate::schema::Database;

/// Completion percentage for `viewed` distinct verses out of `expected`.
///
/// Returns `0.0` when nothing is expected and never more than `100.0`.
#[must_use]
pub fn progress_percentage(viewed: u32, expected: u16) -> f64 {
    if expected == 0 {
        return 0.0;
    }
    (100.0 * f64::from(viewed) / f64::from(expected)).min(100.0)
}

/// Validate a verse key against the reference table.
fn existing_verse(chapter: u16, verse: u16) -> Result<VerseKey> {
    let key = VerseKey::new(chapter, verse).validate()?;
    let meta = chapter_meta(chapter)?;
    if verse > meta.verse_count {
        return Err(Error::InvalidData(format!(
            "{} has {} verses; {key} does not exist",
            meta.name, meta.verse_count
        )));
    }
    Ok(key)
}

/// Records verse views and keeps per-chapter progress in the database.
#[derive(Debug, Clone, Copy)]
pub struct ProgressTracker<'a> {
    db: &'a Database,
}

impl<'a> ProgressTracker<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Record that a verse was viewed. Returns `true` if this was the first
    /// view of that verse.
    pub fn record_verse_viewed(&self, chapter: u16, verse: u16) -> Result<bool> {
        let key = existing_verse(chapter, verse)?;
        let created = self.db.insert_verse_view(key, &Utc::now())?;
        if created {
            log::debug!("First view of {key}");
        }
        Ok(created)
    }

    /// Unrounded completion percentage for a chapter.
    pub fn compute_progress(&self, chapter: u16, expected_verse_count: u16) -> Result<f64> {
        let viewed = self.db.count_viewed_verses(chapter)?;
        Ok(progress_percentage(viewed, expected_verse_count))
    }

    /// Mark every given verse as viewed and store progress of exactly 100.
    ///
    /// All keys are checked before anything is written, and the markers and
    /// progress record are stored in one transaction.
    pub fn mark_chapter_fully_read(&self, meta: &ChapterMeta, verse_numbers: &[u16]) -> Result<ReadingProgress> {
        let keys = verse_numbers
            .iter()
            .map(|&verse| existing_verse(meta.number, verse))
            .collect::<Result<Vec<_>>>()?;

        let tx = self.db.conn().unchecked_transaction()?;
        let now = Utc::now();
        let mut created = 0usize;
        for key in keys {
            if self.db.insert_verse_view(key, &now)? {
                created += 1;
            }
        }
        let progress = self.save_progress(meta.number, meta.name, 100.0)?;
        tx.commit()?;

        log::info!(
            "Marked {} as read ({} new view markers)",
            meta.name,
            created
        );
        Ok(progress)
    }

    /// Store a chapter's progress, updating the existing record in place.
    pub fn save_progress(&self, chapter: u16, chapter_name: &str, percentage: f64) -> Result<ReadingProgress> {
        let progress = ReadingProgress::new(chapter, chapter_name, percentage);
        self.db.upsert_reading_progress(&progress)?;
        Ok(progress)
    }

    /// Recompute a chapter's progress from its view markers and store it.
    ///
    /// A higher stored value (e.g. from marking the chapter read) is kept.
    pub fn refresh(&self, meta: &ChapterMeta) -> Result<ReadingProgress> {
        let computed = self.compute_progress(meta.number, meta.verse_count)?;
        let stored = self
            .db
            .get_reading_progress(meta.number)?
            .map_or(0.0, |p| p.percentage);
        self.save_progress(meta.number, meta.name, computed.max(stored))
    }

    /// View a verse and refresh its chapter in one step.
    pub fn view(&self, meta: &ChapterMeta, verse: u16) -> Result<ReadingProgress> {
        self.record_verse_viewed(meta.number, verse)?;
        self.refresh(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage() {
        assert_eq!(progress_percentage(0, 0), 0.0);
        assert_eq!(progress_percentage(3, 0), 0.0);
        assert_eq!(progress_percentage(7, 7), 100.0);
        assert_eq!(progress_percentage(9, 7), 100.0);
        assert!((progress_percentage(1, 4) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_repeated_view_counts_once() {
        let db = Database::open_in_memory().unwrap();
        let tracker = ProgressTracker::new(&db);

        assert!(tracker.record_verse_viewed(1, 1).unwrap());
        assert!(!tracker.record_verse_viewed(1, 1).unwrap());

        let progress = tracker.compute_progress(1, 7).unwrap();
        assert!((progress - 100.0 / 7.0).abs() < 1e-9);
        let stored = tracker.refresh(chapter_meta(1).unwrap()).unwrap();
        assert_eq!(stored.display_percentage(), 14);
    }

    #[test]
    fn test_progress_is_monotonic_and_capped() {
        let db = Database::open_in_memory().unwrap();
        let tracker = ProgressTracker::new(&db);
        let meta = chapter_meta(103).unwrap();

        let mut last = 0.0;
        for verse in [1, 2, 2, 3, 3] {
            let progress = tracker.view(meta, verse).unwrap();
            assert!(progress.percentage >= last);
            last = progress.percentage;
        }
        assert_eq!(last, 100.0);

        assert_eq!(tracker.compute_progress(103, 3).unwrap(), 100.0);
    }

    #[test]
    fn test_views_of_missing_verses_are_rejected() {
        let db = Database::open_in_memory().unwrap();
        let tracker = ProgressTracker::new(&db);

        for verse in 100..=106 {
            assert!(matches!(
                tracker.record_verse_viewed(1, verse),
                Err(Error::InvalidData(_))
            ));
        }
        assert_eq!(db.count_viewed_verses(1).unwrap(), 0);
        assert_eq!(tracker.compute_progress(1, 7).unwrap(), 0.0);

        // 103 has three verses.
        assert!(tracker.record_verse_viewed(103, 4).is_err());
        assert!(tracker.record_verse_viewed(103, 3).unwrap());
    }

    #[test]
    fn test_mark_chapter_fully_read_is_all_or_nothing() {
        let db = Database::open_in_memory().unwrap();
        let tracker = ProgressTracker::new(&db);
        let meta = chapter_meta(112).unwrap();

        assert!(tracker.mark_chapter_fully_read(meta, &[1, 2, 0, 3, 4]).is_err());
        assert!(tracker.mark_chapter_fully_read(meta, &[1, 2, 5]).is_err());
        assert_eq!(db.count_viewed_verses(112).unwrap(), 0);
        assert!(db.get_reading_progress(112).unwrap().is_none());
    }

    #[test]
    fn test_refresh_keeps_completed_chapter_at_100() {
        let db = Database::open_in_memory().unwrap();
        let tracker = ProgressTracker::new(&db);
        let meta = chapter_meta(1).unwrap();

        tracker.mark_chapter_fully_read(meta, &[1, 2]).unwrap();
        let progress = tracker.view(meta, 3).unwrap();

        assert_eq!(progress.percentage, 100.0);
        assert_eq!(db.get_reading_progress(1).unwrap().unwrap().percentage, 100.0);
    }

    #[test]
    fn test_clear_allows_progress_to_restart() {
        let db = Database::open_in_memory().unwrap();
        let tracker = ProgressTracker::new(&db);
        let meta = chapter_meta(1).unwrap();

        tracker.mark_chapter_fully_read(meta, &[1, 2, 3, 4, 5, 6, 7]).unwrap();
        db.clear_reading_progress().unwrap();
        let progress = tracker.view(meta, 1).unwrap();
        assert!((progress.percentage - 100.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_mark_chapter_fully_read() {
        let db = Database::open_in_memory().unwrap();
        let tracker = ProgressTracker::new(&db);
        let meta = chapter_meta(112).unwrap();

        tracker.record_verse_viewed(112, 2).unwrap();
        let progress = tracker.mark_chapter_fully_read(meta, &[1, 2, 3, 4]).unwrap();

        assert_eq!(progress.percentage, 100.0);
        assert_eq!(db.count_viewed_verses(112).unwrap(), 4);
        assert_eq!(db.list_reading_progress().unwrap().len(), 1);
    }

    #[test]
    fn test_save_progress_updates_in_place() {
        let db = Database::open_in_memory().unwrap();
        let tracker = ProgressTracker::new(&db);

        tracker.save_progress(18, "Al-Kahf", 20.0).unwrap();
        tracker.save_progress(18, "Al-Kahf", 40.0).unwrap();

        let stored = db.get_reading_progress(18).unwrap().unwrap();
        assert_eq!(stored.percentage, 40.0);
        assert_eq!(db.list_reading_progress().unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_invalid_keys() {
        let db = Database::open_in_memory().unwrap();
        let tracker = ProgressTracker::new(&db);
        assert!(matches!(
            tracker.record_verse_viewed(115, 1),
            Err(Error::ChapterOutOfRange(115))
        ));
        assert!(tracker.record_verse_viewed(1, 0).is_err());
    }
}
