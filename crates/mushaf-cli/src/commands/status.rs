use anyhow::Result;
use std::path::Path;

use mushaf_core::schema::Database;
use mushaf_core::{ReadingStats, CHAPTER_COUNT};
use mushaf_etl::incomplete_chapters;

pub fn show_status(db: &Database, db_path: &Path) -> Result<()> {
    let chapters = db.load_chapters()?;
    let verses: usize = chapters.iter().map(|c| c.verses.len()).sum();
    let aligned = chapters
        .iter()
        .flat_map(|c| &c.verses)
        .filter(|v| v.has_word_alignment())
        .count();

    println!("\n📊 Mushaf Status\n");
    println!("  Database: {}", db_path.display());
    println!("  Chapters: {} of {}", chapters.len(), CHAPTER_COUNT);
    println!("  Verses: {verses} ({aligned} with word alignment)");

    if chapters.is_empty() {
        println!("\n  Run `mushaf import <dataset>` to load the text");
        return Ok(());
    }

    let incomplete = incomplete_chapters(&chapters);
    if !incomplete.is_empty() {
        println!(
            "  Incomplete chapters: {}",
            super::import::summarize_numbers(&incomplete)
        );
    }

    let stats = ReadingStats::collect(db)?;
    println!(
        "\n  Read: {} verses ({:.1}%)   Memorized: {} ({:.1}%)",
        stats.verses_read,
        stats.reading_percentage,
        stats.verses_memorized,
        stats.memorization_percentage
    );
    println!(
        "  Favorites: {}   Notes: {}   Saved words: {}",
        stats.favorites,
        stats.notes,
        db.list_saved_words()?.len()
    );

    Ok(())
}
