//! Word-by-word alignment.
//!
//! An optional JSON dataset breaks verses into individual words with their
//! translations. Matching verses get their synthetic single word replaced;
//! the rest are left alone.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use mushaf_core::model::{Chapter, VerseKey, Word};

use crate::error::EtlResult;

/// One aligned word from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlignedWord {
    #[serde(alias = "surah")]
    pub sura: u16,
    #[serde(alias = "ayah")]
    pub aya: u16,
    pub position: u16,
    pub arabic: String,
    pub translation: String,
}

/// Words grouped by verse.
#[derive(Debug, Clone, Default)]
pub struct WordAlignment {
    words: HashMap<VerseKey, Vec<Word>>,
}

impl WordAlignment {
    /// Group aligned words by verse, ordered by position.
    #[must_use]
    pub fn from_words(aligned: Vec<AlignedWord>) -> Self {
        let mut words: HashMap<VerseKey, Vec<Word>> = HashMap::new();
        for word in aligned {
            let key = VerseKey::new(word.sura, word.aya);
            words
                .entry(key)
                .or_default()
                .push(Word::new(word.arabic, word.translation, word.position));
        }
        for list in words.values_mut() {
            list.sort_by_key(|w| w.position);
            list.dedup_by_key(|w| w.position);
        }
        Self { words }
    }

    /// Parse the JSON form: a list of word objects.
    pub fn from_json(content: &str) -> EtlResult<Self> {
        let aligned: Vec<AlignedWord> = serde_json::from_str(content)?;
        Ok(Self::from_words(aligned))
    }

    /// Load an alignment file. A missing file gives an empty alignment.
    pub fn load(path: &Path) -> EtlResult<Self> {
        if !path.exists() {
            log::warn!("No word alignment at {}", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let alignment = Self::from_json(&content)?;
        log::info!(
            "Loaded word alignment for {} verses from {}",
            alignment.len(),
            path.display()
        );
        Ok(alignment)
    }

    /// Number of verses with an alignment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn words_for(&self, key: VerseKey) -> Option<&[Word]> {
        self.words.get(&key).map(Vec::as_slice)
    }
}

/// Replace the words of every aligned verse. Returns how many verses changed.
pub fn apply_word_alignment(chapters: &mut [Chapter], alignment: &WordAlignment) -> usize {
    let mut applied = 0;
    for verse in chapters.iter_mut().flat_map(|c| c.verses.iter_mut()) {
        if let Some(words) = alignment.words_for(verse.key) {
            if !words.is_empty() {
                verse.words = words.to_vec();
                applied += 1;
            }
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use mushaf_core::model::Verse;
    use mushaf_core::{chapter_meta, CHAPTERS};

    const FATIHAH_1: &str = r#"[
        {"sura": 1, "aya": 1, "position": 2, "arabic": "الرَّحْمَٰنِ", "translation": "the Most Gracious"},
        {"sura": 1, "aya": 1, "position": 0, "arabic": "بِسْمِ", "translation": "In the name"},
        {"sura": 1, "aya": 1, "position": 1, "arabic": "اللَّهِ", "translation": "of Allah"},
        {"sura": 1, "aya": 1, "position": 3, "arabic": "الرَّحِيمِ", "translation": "the Most Merciful"}
    ]"#;

    fn fatihah() -> Vec<Chapter> {
        let chapter = Chapter::from_meta(chapter_meta(1).unwrap()).with_verses(vec![
            Verse::new(
                VerseKey::new(1, 1),
                "In the name of Allah, the Most Gracious, the Most Merciful",
                "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ",
            ),
            Verse::new(VerseKey::new(1, 2), "All praise is for Allah", "الْحَمْدُ لِلَّهِ"),
        ]);
        vec![chapter]
    }

    #[test]
    fn test_alignment_orders_by_position() {
        let alignment = WordAlignment::from_json(FATIHAH_1).unwrap();
        assert_eq!(alignment.len(), 1);
        let words = alignment.words_for(VerseKey::new(1, 1)).unwrap();
        let positions: Vec<_> = words.iter().map(|w| w.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_apply_replaces_only_aligned_verses() {
        let alignment = WordAlignment::from_json(FATIHAH_1).unwrap();
        let mut chapters = fatihah();
        assert_eq!(apply_word_alignment(&mut chapters, &alignment), 1);

        let aligned = &chapters[0].verses[0];
        assert_eq!(aligned.words.len(), 4);
        assert!(aligned.has_word_alignment());
        assert_eq!(aligned.joined_words(), aligned.original_text);

        let untouched = &chapters[0].verses[1];
        assert_eq!(untouched.words.len(), 1);
        assert!(!untouched.has_word_alignment());
    }

    #[test]
    fn test_alignment_for_missing_verse_is_ignored() {
        let alignment = WordAlignment::from_json(
            r#"[{"surah": 2, "ayah": 1, "position": 0, "arabic": "الم", "translation": "Alif Lam Mim"}]"#,
        )
        .unwrap();
        let mut chapters: Vec<Chapter> = CHAPTERS.iter().map(Chapter::from_meta).collect();
        assert_eq!(apply_word_alignment(&mut chapters, &alignment), 0);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let alignment = WordAlignment::load(&dir.path().join("words.json")).unwrap();
        assert!(alignment.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(WordAlignment::from_json("{").is_err());
    }
}
