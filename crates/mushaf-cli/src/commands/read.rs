use anyhow::{Context, Result};
use std::collections::HashMap;

use mushaf_core::schema::Database;
use mushaf_core::{chapter_meta, ProgressTracker, ReadingPreferences};
use mushaf_search::filter_chapters;

use crate::display::{chapter_heading, print_verse, progress_bar};

/// How `mushaf read` displays and tracks a chapter.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub verse: Option<u16>,
    pub words: bool,
    pub track: bool,
}

/// List chapters with reading progress, optionally filtered.
pub fn list_chapters(db: &Database, filter: Option<&str>) -> Result<()> {
    let chapters = db.load_chapters()?;
    if chapters.is_empty() {
        println!("No chapters loaded. Run `mushaf import <dataset>` first.");
        return Ok(());
    }

    let progress: HashMap<u16, f64> = db
        .list_reading_progress()?
        .into_iter()
        .map(|p| (p.chapter, p.percentage))
        .collect();

    let matching = filter_chapters(&chapters, filter.unwrap_or_default());
    for chapter in &matching {
        let pct = progress.get(&chapter.number).copied().unwrap_or(0.0);
        let loaded = if chapter.is_complete() {
            String::new()
        } else {
            format!("  ({} of {} loaded)", chapter.verses.len(), chapter.verse_count)
        };
        println!(
            "{:>3}. {:<18} {:<10} {:>3} verses {} {:>3}%{}",
            chapter.number,
            chapter.name,
            chapter.origin,
            chapter.verse_count,
            progress_bar(pct, 10),
            pct.floor(),
            loaded
        );
    }

    if matching.is_empty() {
        println!("No chapters match '{}'", filter.unwrap_or_default());
    }
    Ok(())
}

/// Print a chapter (or one verse of it) and record what was shown as viewed.
pub fn read_chapter(
    db: &Database,
    number: u16,
    prefs: &ReadingPreferences,
    options: &ReadOptions,
) -> Result<()> {
    let meta = chapter_meta(number)?;
    let chapter = db
        .load_chapter(number)?
        .with_context(|| format!("Chapter {number} is not loaded. Run `mushaf import` first."))?;

    let verses: Vec<_> = match options.verse {
        Some(n) => vec![chapter
            .verse(n)
            .with_context(|| format!("Verse {number}:{n} is not loaded"))?],
        None => chapter.verses.iter().collect(),
    };

    println!("{}\n", chapter_heading(&chapter));
    for verse in &verses {
        print_verse(verse, prefs, options.words);
        println!();
    }

    if options.track && !verses.is_empty() {
        let tracker = ProgressTracker::new(db);
        let mut new_views = 0;
        for verse in &verses {
            if tracker.record_verse_viewed(number, verse.key.verse)? {
                new_views += 1;
            }
        }
        let progress = tracker.refresh(meta)?;
        log::debug!("Recorded {new_views} new views in chapter {number}");
        println!(
            "Progress: {} {}%",
            progress_bar(progress.percentage, 20),
            progress.display_percentage()
        );
    }
    Ok(())
}
