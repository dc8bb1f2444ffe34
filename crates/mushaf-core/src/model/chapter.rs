use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::model::verse::Verse;
use crate::reference::ChapterMeta;

/// Where a chapter was revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    Meccan,
    Medinan,
}

impl Origin {
    /// Display label, also the stored and searched representation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Meccan => "Meccan",
            Self::Medinan => "Medinan",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Origin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("meccan") {
            Ok(Self::Meccan)
        } else if s.eq_ignore_ascii_case("medinan") {
            Ok(Self::Medinan)
        } else {
            Err(Error::InvalidData(format!("unknown origin: {s}")))
        }
    }
}

/// A chapter (surah) with its verses.
///
/// A chapter whose verse list is shorter than `verse_count` is simply not
/// fully loaded yet; every chapter of the reference table is representable
/// with zero verses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u16,
    pub name: String,
    pub original_name: String,
    pub origin: Origin,

    /// Expected number of verses, from the reference table.
    pub verse_count: u16,

    /// Verses in ascending verse-number order.
    pub verses: Vec<Verse>,
}

impl Chapter {
    /// An empty chapter built from reference metadata.
    #[must_use]
    pub fn from_meta(meta: &ChapterMeta) -> Self {
        Self {
            number: meta.number,
            name: meta.name.to_string(),
            original_name: meta.original_name.to_string(),
            origin: meta.origin,
            verse_count: meta.verse_count,
            verses: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_verses(mut self, mut verses: Vec<Verse>) -> Self {
        verses.sort_by_key(|v| v.key.verse);
        self.verses = verses;
        self
    }

    /// Whether every expected verse has been loaded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.verses.len() == usize::from(self.verse_count)
    }

    #[must_use]
    pub fn verse(&self, number: u16) -> Option<&Verse> {
        self.verses
            .binary_search_by_key(&number, |v| v.key.verse)
            .ok()
            .and_then(|idx| self.verses.get(idx))
    }

    /// Verse numbers of the loaded verses.
    #[must_use]
    pub fn verse_numbers(&self) -> Vec<u16> {
        self.verses.iter().map(|v| v.key.verse).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VerseKey;
    use crate::reference::chapter_meta;

    #[test]
    fn test_origin_parse() {
        assert_eq!("meccan".parse::<Origin>().unwrap(), Origin::Meccan);
        assert_eq!("Medinan".parse::<Origin>().unwrap(), Origin::Medinan);
        assert!("Andalusian".parse::<Origin>().is_err());
        assert_eq!(Origin::Medinan.to_string(), "Medinan");
    }

    #[test]
    fn test_chapter_from_meta_is_empty() {
        let chapter = Chapter::from_meta(chapter_meta(112).unwrap());
        assert_eq!(chapter.name, "Al-Ikhlas");
        assert!(chapter.verses.is_empty());
        assert!(!chapter.is_complete());
    }

    #[test]
    fn test_with_verses_sorts_and_completes() {
        let verses = (1..=4)
            .rev()
            .map(|n| Verse::new(VerseKey::new(112, n), format!("v{n}"), "نص"))
            .collect();
        let chapter = Chapter::from_meta(chapter_meta(112).unwrap()).with_verses(verses);

        assert_eq!(chapter.verse_numbers(), vec![1, 2, 3, 4]);
        assert!(chapter.is_complete());
        assert_eq!(chapter.verse(3).unwrap().translation, "v3");
        assert!(chapter.verse(5).is_none());
    }
}
