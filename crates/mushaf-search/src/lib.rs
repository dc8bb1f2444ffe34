//! Search for mushaf.
//!
//! Case-insensitive substring matching over loaded chapters, verses, and
//! saved words. All filters preserve the input order and borrow from the
//! input rather than copying it.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

use serde::Serialize;
use std::fmt;

use mushaf_core::model::{Chapter, SavedWord, Verse, VerseKey};

/// A normalized search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    needle: String,
}

impl Query {
    /// Lowercase raw input as typed. Returns `None` only for the empty
    /// string; whitespace is part of the query.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self {
                needle: raw.to_lowercase(),
            })
        }
    }

    /// Case-insensitive substring test.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.needle
    }
}

/// Which part of a verse matched a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchField {
    Translation,
    OriginalText,
    WordOriginal,
    WordTranslation,
}

impl MatchField {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::OriginalText => "original text",
            Self::WordOriginal => "word",
            Self::WordTranslation => "word translation",
        }
    }
}

impl fmt::Display for MatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A verse that matched a query.
#[derive(Debug, Clone, Copy)]
pub struct VerseHit<'a> {
    pub chapter: &'a Chapter,
    pub verse: &'a Verse,
    /// The first field that matched, in [`MatchField`] order.
    pub field: MatchField,
}

impl VerseHit<'_> {
    #[must_use]
    pub const fn key(&self) -> VerseKey {
        self.verse.key
    }
}

fn verse_match(verse: &Verse, query: &Query) -> Option<MatchField> {
    if query.matches(&verse.translation) {
        return Some(MatchField::Translation);
    }
    if query.matches(&verse.original_text) {
        return Some(MatchField::OriginalText);
    }
    if verse.words.iter().any(|w| query.matches(&w.original)) {
        return Some(MatchField::WordOriginal);
    }
    if verse.words.iter().any(|w| query.matches(&w.translation)) {
        return Some(MatchField::WordTranslation);
    }
    None
}

fn chapter_matches(chapter: &Chapter, query: &Query) -> bool {
    query.matches(&chapter.name)
        || query.matches(&chapter.original_name)
        || query.matches(chapter.origin.label())
        || chapter
            .verses
            .iter()
            .any(|verse| verse_match(verse, query).is_some())
}

/// Chapters matching `query` by name, original name, origin, or any verse
/// or word text.
///
/// An empty query returns every chapter.
#[must_use]
pub fn filter_chapters<'a>(chapters: &'a [Chapter], query: &str) -> Vec<&'a Chapter> {
    let Some(query) = Query::parse(query) else {
        return chapters.iter().collect();
    };
    chapters
        .iter()
        .filter(|chapter| chapter_matches(chapter, &query))
        .collect()
}

/// Individual verses matching `query`, in reading order.
///
/// An empty query matches no verses.
#[must_use]
pub fn search_verses<'a>(chapters: &'a [Chapter], query: &str) -> Vec<VerseHit<'a>> {
    let Some(query) = Query::parse(query) else {
        return Vec::new();
    };
    chapters
        .iter()
        .flat_map(|chapter| {
            let query = &query;
            chapter.verses.iter().filter_map(move |verse| {
                verse_match(verse, query).map(|field| VerseHit {
                    chapter,
                    verse,
                    field,
                })
            })
        })
        .collect()
}

/// Saved words matching `query` by word, translation, or chapter name,
/// optionally limited to words not yet mastered.
#[must_use]
pub fn filter_saved_words<'a>(
    words: &'a [SavedWord],
    query: &str,
    unmastered_only: bool,
) -> Vec<&'a SavedWord> {
    let query = Query::parse(query);
    words
        .iter()
        .filter(|word| !(unmastered_only && word.mastered))
        .filter(|word| {
            query.as_ref().is_none_or(|q| {
                q.matches(&word.original)
                    || q.matches(&word.translation)
                    || q.matches(&word.chapter_name)
            })
        })
        .collect()
}
