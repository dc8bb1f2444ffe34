use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{SavedWordId, VerseKey};

/// A word saved to the personal vocabulary list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedWord {
    pub id: SavedWordId,
    pub original: String,
    pub translation: String,
    pub key: VerseKey,
    pub chapter_name: String,
    pub position: u16,
    /// Free-form notes about the word.
    pub notes: String,
    pub mastered: bool,
    pub saved_at: DateTime<Utc>,
}

impl SavedWord {
    #[must_use]
    pub fn new(
        original: impl Into<String>,
        translation: impl Into<String>,
        key: VerseKey,
        chapter_name: impl Into<String>,
        position: u16,
    ) -> Self {
        Self {
            id: SavedWordId::new(),
            original: original.into(),
            translation: translation.into(),
            key,
            chapter_name: chapter_name.into(),
            position,
            notes: String::new(),
            mastered: false,
            saved_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}
