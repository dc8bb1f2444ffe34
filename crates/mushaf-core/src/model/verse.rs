use serde::{Deserialize, Serialize};

use crate::model::ids::VerseKey;

/// A single word of a verse.
///
/// `position` is zero-based and defines display order (rendered right to
/// left for the original script).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub original: String,
    pub translation: String,
    pub position: u16,
}

impl Word {
    #[must_use]
    pub fn new(original: impl Into<String>, translation: impl Into<String>, position: u16) -> Self {
        Self {
            original: original.into(),
            translation: translation.into(),
            position,
        }
    }
}

/// A verse (ayah) of a chapter.
///
/// `original_text` is the canonical full text. `words` is an enrichment:
/// by default it holds one synthetic word spanning the whole verse, and a
/// word-alignment dataset may replace it with a real breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub key: VerseKey,
    pub translation: String,
    pub original_text: String,
    pub footnote: Option<String>,
    pub words: Vec<Word>,
}

impl Verse {
    /// A verse with a single synthetic word covering the full text.
    #[must_use]
    pub fn new(key: VerseKey, translation: impl Into<String>, original_text: impl Into<String>) -> Self {
        let translation = translation.into();
        let original_text = original_text.into();
        let words = vec![Word::new(original_text.clone(), translation.clone(), 0)];
        Self {
            key,
            translation,
            original_text,
            footnote: None,
            words,
        }
    }

    #[must_use]
    pub fn with_footnote(mut self, footnote: impl Into<String>) -> Self {
        let footnote = footnote.into();
        self.footnote = if footnote.trim().is_empty() {
            None
        } else {
            Some(footnote)
        };
        self
    }

    /// Replace the words, ordering them by position.
    #[must_use]
    pub fn with_words(mut self, mut words: Vec<Word>) -> Self {
        words.sort_by_key(|w| w.position);
        self.words = words;
        self
    }

    /// Whether the words are a real breakdown rather than the synthetic one.
    #[must_use]
    pub fn has_word_alignment(&self) -> bool {
        self.words.len() > 1
            || self
                .words
                .first()
                .is_some_and(|w| w.original != self.original_text)
    }

    /// Words joined back into running text.
    #[must_use]
    pub fn joined_words(&self) -> String {
        self.words
            .iter()
            .map(|w| w.original.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_new_has_synthetic_word() {
        let verse = Verse::new(VerseKey::new(1, 1), "In the name of Allah", "بِسْمِ اللَّهِ");
        assert_eq!(verse.words.len(), 1);
        assert_eq!(verse.words[0].position, 0);
        assert_eq!(verse.words[0].original, "بِسْمِ اللَّهِ");
        assert!(!verse.has_word_alignment());
        assert_eq!(verse.joined_words(), verse.original_text);
    }

    #[test]
    fn test_with_words_orders_by_position() {
        let verse = Verse::new(VerseKey::new(1, 1), "In the name of Allah", "بِسْمِ اللَّهِ")
            .with_words(vec![
                Word::new("اللَّهِ", "of Allah", 1),
                Word::new("بِسْمِ", "In the name", 0),
            ]);
        assert_eq!(verse.words[0].translation, "In the name");
        assert!(verse.has_word_alignment());
        assert_eq!(verse.joined_words(), "بِسْمِ اللَّهِ");
    }

    #[test]
    fn test_blank_footnote_is_none() {
        let verse = Verse::new(VerseKey::new(1, 1), "t", "o").with_footnote("  ");
        assert!(verse.footnote.is_none());
        let verse = verse.with_footnote("[1] note");
        assert_eq!(verse.footnote.as_deref(), Some("[1] note"));
    }
}
