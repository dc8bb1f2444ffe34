use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::reference::CHAPTER_COUNT;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| Error::InvalidData(format!("invalid id '{s}': {e}")))
            }
        }
    };
}

define_id!(FavoriteId, "Unique identifier for a favorited verse.");
define_id!(NoteId, "Unique identifier for a personal note.");
define_id!(CategoryId, "Unique identifier for a note category.");
define_id!(
    MemorizedId,
    "Unique identifier for a memorization marker."
);
define_id!(SavedWordId, "Unique identifier for a saved vocabulary word.");

/// Natural key of a verse: chapter number plus verse number within it.
///
/// Annotation records copy this key instead of pointing at a loaded verse,
/// so they stay readable when the content tables are reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VerseKey {
    pub chapter: u16,
    pub verse: u16,
}

impl VerseKey {
    #[must_use]
    pub const fn new(chapter: u16, verse: u16) -> Self {
        Self { chapter, verse }
    }

    /// Check that the chapter is one of the 114 and the verse is not zero.
    pub fn validate(self) -> Result<Self> {
        if self.chapter == 0 || usize::from(self.chapter) > CHAPTER_COUNT {
            return Err(Error::ChapterOutOfRange(self.chapter));
        }
        if self.verse == 0 {
            return Err(Error::InvalidData(format!(
                "verse numbers start at 1 (got {self})"
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

impl FromStr for VerseKey {
    type Err = Error;

    /// Parse the conventional `chapter:verse` notation, e.g. `2:255`.
    fn from_str(s: &str) -> Result<Self> {
        let (chapter, verse) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| Error::InvalidData(format!("expected chapter:verse, got '{s}'")))?;
        let chapter = chapter
            .trim()
            .parse::<u16>()
            .map_err(|e| Error::InvalidData(format!("bad chapter in '{s}': {e}")))?;
        let verse = verse
            .trim()
            .parse::<u16>()
            .map_err(|e| Error::InvalidData(format!("bad verse in '{s}': {e}")))?;
        Self::new(chapter, verse).validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_id_generation() {
        let id1 = NoteId::new();
        let id2 = NoteId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_parse_round_trip() {
        let id = CategoryId::new();
        let parsed: CategoryId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<CategoryId>().is_err());
    }

    #[test]
    fn test_verse_key_parse() {
        let key: VerseKey = "2:255".parse().unwrap();
        assert_eq!(key, VerseKey::new(2, 255));
        assert_eq!(key.to_string(), "2:255");
    }

    #[test]
    fn test_verse_key_rejects_out_of_range() {
        assert!(matches!(
            "115:1".parse::<VerseKey>(),
            Err(Error::ChapterOutOfRange(115))
        ));
        assert!("0:1".parse::<VerseKey>().is_err());
        assert!("1:0".parse::<VerseKey>().is_err());
        assert!("1-1".parse::<VerseKey>().is_err());
    }

    #[test]
    fn test_verse_key_ordering() {
        let mut keys = vec![VerseKey::new(2, 1), VerseKey::new(1, 7), VerseKey::new(1, 2)];
        keys.sort();
        assert_eq!(
            keys,
            vec![VerseKey::new(1, 2), VerseKey::new(1, 7), VerseKey::new(2, 1)]
        );
    }
}
