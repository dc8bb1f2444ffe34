use anyhow::{Context, Result};

use mushaf_core::model::VerseKey;
use mushaf_core::schema::Database;
use mushaf_core::{chapter_meta, ProgressTracker, ReadingStats};

use crate::display::progress_bar;

#[derive(Debug, clap::Subcommand)]
pub enum ProgressCommand {
    /// Record a verse as viewed, e.g. `2:255`
    View {
        #[arg(value_parser = crate::parse_verse_key)]
        verse: VerseKey,
    },
    /// Mark a whole chapter as read
    Complete { chapter: u16 },
    /// Show progress for one chapter, or every chapter started
    Show { chapter: Option<u16> },
    /// Show Quran-wide reading and memorization statistics
    Stats,
    /// Forget all reading progress
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(db: &Database, command: ProgressCommand) -> Result<()> {
    let tracker = ProgressTracker::new(db);

    match command {
        ProgressCommand::View { verse } => {
            let meta = chapter_meta(verse.chapter)?;
            let first = tracker.record_verse_viewed(verse.chapter, verse.verse)?;
            let progress = tracker.refresh(meta)?;
            println!(
                "{} {} · {} {}%",
                if first { "✓ Viewed" } else { "Already viewed" },
                verse,
                progress_bar(progress.percentage, 20),
                progress.display_percentage()
            );
        }
        ProgressCommand::Complete { chapter } => {
            let meta = chapter_meta(chapter)?;
            let verses: Vec<u16> = (1..=meta.verse_count).collect();
            tracker.mark_chapter_fully_read(meta, &verses)?;
            println!("✓ Marked {} as read", meta.name);
        }
        ProgressCommand::Show { chapter: Some(chapter) } => {
            let meta = chapter_meta(chapter)?;
            let viewed = db.count_viewed_verses(chapter)?;
            let progress = db.get_reading_progress(chapter)?;
            let pct = progress.as_ref().map_or(0.0, |p| p.percentage);
            println!("{}. {}", meta.number, meta.name);
            println!("  Viewed: {} of {} verses", viewed, meta.verse_count);
            println!("  Progress: {} {}%", progress_bar(pct, 20), pct.floor());
            if let Some(progress) = progress {
                println!("  Last read: {}", progress.last_read_at.format("%Y-%m-%d %H:%M"));
            }
        }
        ProgressCommand::Show { chapter: None } => {
            let all = db.list_reading_progress()?;
            if all.is_empty() {
                println!("No reading progress yet.");
            }
            for progress in all.iter().filter(|p| p.is_started()) {
                println!(
                    "{:>3}. {:<18} {} {:>3}%",
                    progress.chapter,
                    progress.chapter_name,
                    progress_bar(progress.percentage, 20),
                    progress.display_percentage()
                );
            }
        }
        ProgressCommand::Stats => {
            let stats = ReadingStats::collect(db).context("Failed to collect statistics")?;
            println!("\n📖 Reading\n");
            println!(
                "  Verses read: {} of {} ({:.1}%)",
                stats.verses_read, stats.total_verses, stats.reading_percentage
            );
            println!("  Chapters started: {}", stats.chapters_started);
            println!("  Chapters completed: {}", stats.chapters_completed);
            println!("\n🧠 Memorization\n");
            println!(
                "  Verses memorized: {} ({:.1}%)",
                stats.verses_memorized, stats.memorization_percentage
            );
            println!("\n⭐ Favorites: {}   📝 Notes: {}", stats.favorites, stats.notes);
        }
        ProgressCommand::Clear { yes } => {
            if !yes {
                anyhow::bail!("This deletes all reading progress. Re-run with --yes to confirm.");
            }
            let removed = db.clear_reading_progress()?;
            println!("✓ Cleared progress for {removed} chapters");
        }
    }
    Ok(())
}
