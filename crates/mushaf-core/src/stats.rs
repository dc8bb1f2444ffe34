//! Quran-wide reading statistics.

use serde::Serialize;

use crate::error::Result;
use crate::model::ReadingProgress;
use crate::reference::{chapter_meta, total_verse_count};
use crate::schema::Database;

/// Summary of reading and memorization across all chapters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingStats {
    pub verses_read: u32,
    pub total_verses: u32,
    pub reading_percentage: f64,
    pub verses_memorized: u32,
    pub memorization_percentage: f64,
    pub chapters_started: usize,
    pub chapters_completed: usize,
    pub favorites: usize,
    pub notes: usize,
}

impl ReadingStats {
    /// Gather statistics from the stored progress and annotations.
    pub fn collect(db: &Database) -> Result<Self> {
        let progress = db.list_reading_progress()?;
        let mut stats = Self::from_progress(&progress, db.count_memorized()?);
        stats.favorites = db.list_favorites()?.len();
        stats.notes = db.list_notes(None)?.len();
        Ok(stats)
    }

    /// Compute the reading and memorization figures from progress records.
    ///
    /// Records for chapters outside the reference table are ignored.
    #[must_use]
    pub fn from_progress(progress: &[ReadingProgress], verses_memorized: u32) -> Self {
        let total_verses = total_verse_count();
        let verses_read = progress
            .iter()
            .filter_map(|p| {
                chapter_meta(p.chapter)
                    .ok()
                    .map(|meta| verses_covered(p.percentage, meta.verse_count))
            })
            .sum();

        Self {
            verses_read,
            total_verses,
            reading_percentage: share(verses_read, total_verses),
            verses_memorized,
            memorization_percentage: share(verses_memorized, total_verses),
            chapters_started: progress.iter().filter(|p| p.is_started()).count(),
            chapters_completed: progress.iter().filter(|p| p.is_complete()).count(),
            favorites: 0,
            notes: 0,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn verses_covered(percentage: f64, verse_count: u16) -> u32 {
    (percentage.clamp(0.0, 100.0) / 100.0 * f64::from(verse_count)).floor() as u32
}

fn share(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * f64::from(part) / f64::from(total)
    }
}
