use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::VerseKey;

/// Aggregate reading progress for one chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingProgress {
    pub chapter: u16,
    pub chapter_name: String,
    /// Completion percentage in `0.0..=100.0`.
    pub percentage: f64,
    pub last_read_at: DateTime<Utc>,
}

impl ReadingProgress {
    #[must_use]
    pub fn new(chapter: u16, chapter_name: impl Into<String>, percentage: f64) -> Self {
        Self {
            chapter,
            chapter_name: chapter_name.into(),
            percentage: percentage.clamp(0.0, 100.0),
            last_read_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.percentage > 0.0
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.percentage >= 100.0
    }

    /// Whole-number percentage as shown to the reader (floored).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn display_percentage(&self) -> u8 {
        self.percentage.floor() as u8
    }
}

/// Marker that a verse has been viewed at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseView {
    pub key: VerseKey,
    pub viewed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_progress_clamps() {
        assert_eq!(ReadingProgress::new(1, "Al-Fatihah", 140.0).percentage, 100.0);
        assert_eq!(ReadingProgress::new(1, "Al-Fatihah", -3.0).percentage, 0.0);
    }

    #[test]
    fn test_display_percentage_floors() {
        let progress = ReadingProgress::new(1, "Al-Fatihah", 100.0 / 7.0);
        assert_eq!(progress.display_percentage(), 14);
        assert!(progress.is_started());
        assert!(!progress.is_complete());
    }
}
