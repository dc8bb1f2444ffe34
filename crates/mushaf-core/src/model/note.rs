use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ids::{CategoryId, NoteId, VerseKey};

/// Palette offered for new categories when no color is given.
pub const CATEGORY_PALETTE: &[&str] = &[
    "#3498DB", "#E74C3C", "#2ECC71", "#F39C12", "#9B59B6", "#1ABC9C",
];

/// A user-defined label for grouping notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Display color as `#RRGGBB`.
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a category. The name must not be blank.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidData("category name must not be empty".into()));
        }
        Ok(Self {
            id: CategoryId::new(),
            name,
            color: color.into(),
            created_at: Utc::now(),
        })
    }

    /// Pick a palette color deterministically from the name.
    #[must_use]
    pub fn palette_color(name: &str) -> &'static str {
        let idx = name.bytes().map(usize::from).sum::<usize>() % CATEGORY_PALETTE.len();
        CATEGORY_PALETTE[idx]
    }
}

/// A personal note attached to a verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub key: VerseKey,
    pub original_text: String,
    pub translation: String,
    pub text: String,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    #[must_use]
    pub fn new(
        key: VerseKey,
        original_text: impl Into<String>,
        translation: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: NoteId::new(),
            key,
            original_text: original_text.into(),
            translation: translation.into(),
            text: text.into(),
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// A note together with its category, as shown in lists and exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteWithCategory {
    pub note: Note,
    pub category: Option<Category>,
}

impl NoteWithCategory {
    /// Category name, or "Uncategorized".
    #[must_use]
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map_or("Uncategorized", |c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_requires_name() {
        assert!(Category::new("   ", "#000000").is_err());
        let category = Category::new(" Reflection ", "#3498DB").unwrap();
        assert_eq!(category.name, "Reflection");
    }

    #[test]
    fn test_palette_color_is_stable() {
        let first = Category::palette_color("Tafsir");
        assert_eq!(first, Category::palette_color("Tafsir"));
        assert!(CATEGORY_PALETTE.contains(&first));
    }

    #[test]
    fn test_note_builder() {
        let category = Category::new("Duas", "#2ECC71").unwrap();
        let note = Note::new(VerseKey::new(2, 201), "رَبَّنَا", "Our Lord", "recite daily")
            .with_category(category.id);
        assert_eq!(note.category_id, Some(category.id));
        assert_eq!(note.created_at, note.updated_at);

        let shown = NoteWithCategory {
            note,
            category: None,
        };
        assert_eq!(shown.category_name(), "Uncategorized");
    }
}
