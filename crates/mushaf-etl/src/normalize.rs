//! Grouping raw verses into chapters.

use std::collections::{BTreeMap, HashSet};

use mushaf_core::model::{Chapter, Verse, VerseKey};
use mushaf_core::ChapterMeta;

use crate::loader::RawVerse;

/// Build one [`Chapter`] per reference entry from a flat list of verses.
///
/// Verses are grouped by chapter and ordered by verse number. Chapters with
/// no verses come out empty. When the same `(chapter, verse)` appears more
/// than once, the first occurrence is kept.
#[must_use]
pub fn normalize(records: &[RawVerse], reference: &[ChapterMeta]) -> Vec<Chapter> {
    let known: HashSet<u16> = reference.iter().map(|meta| meta.number).collect();
    let mut grouped: BTreeMap<u16, BTreeMap<u16, Verse>> = BTreeMap::new();

    for record in records {
        if !known.contains(&record.chapter_number) {
            log::warn!(
                "Dropping {}: chapter {} is not in the reference table",
                record.key(),
                record.chapter_number
            );
            continue;
        }

        let verses = grouped.entry(record.chapter_number).or_default();
        if verses.contains_key(&record.verse_number) {
            log::warn!("Dropping duplicate verse {}", record.key());
            continue;
        }
        verses.insert(record.verse_number, to_verse(record));
    }

    reference
        .iter()
        .map(|meta| {
            let verses = grouped
                .remove(&meta.number)
                .map(|verses| verses.into_values().collect())
                .unwrap_or_default();
            Chapter::from_meta(meta).with_verses(verses)
        })
        .collect()
}

fn to_verse(record: &RawVerse) -> Verse {
    Verse::new(
        VerseKey::new(record.chapter_number, record.verse_number),
        record.translation.as_str(),
        record.original_text.as_str(),
    )
    .with_footnote(record.footnote.as_str())
}

/// Chapters whose loaded verse count differs from the expected count.
#[must_use]
pub fn incomplete_chapters(chapters: &[Chapter]) -> Vec<u16> {
    chapters
        .iter()
        .filter(|chapter| !chapter.is_complete())
        .map(|chapter| chapter.number)
        .collect()
}
