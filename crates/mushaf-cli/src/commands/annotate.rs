use anyhow::Result;

use mushaf_core::model::{FavoriteVerse, MemorizedVerse, VerseKey};
use mushaf_core::schema::Database;

use super::require_verse;
use crate::display::truncate;

#[derive(Debug, clap::Subcommand)]
pub enum FavoriteCommand {
    /// Star a verse, e.g. `2:255`
    Add {
        #[arg(value_parser = crate::parse_verse_key)]
        verse: VerseKey,
    },
    /// Unstar a verse
    Remove {
        #[arg(value_parser = crate::parse_verse_key)]
        verse: VerseKey,
    },
    /// Star an unstarred verse, or unstar a starred one
    Toggle {
        #[arg(value_parser = crate::parse_verse_key)]
        verse: VerseKey,
    },
    /// List starred verses, newest first
    List,
}

#[derive(Debug, clap::Subcommand)]
pub enum MemorizeCommand {
    /// Mark a verse as memorized
    Add {
        #[arg(value_parser = crate::parse_verse_key)]
        verse: VerseKey,
    },
    /// Remove the memorized mark from a verse
    Remove {
        #[arg(value_parser = crate::parse_verse_key)]
        verse: VerseKey,
    },
    /// List memorized verses in reading order
    List,
}

pub fn run_favorite(db: &Database, command: FavoriteCommand) -> Result<()> {
    match command {
        FavoriteCommand::Add { verse } => {
            let stored = require_verse(db, verse)?;
            let favorite = db.add_favorite(&FavoriteVerse::new(
                verse,
                stored.original_text,
                stored.translation,
            ))?;
            println!("⭐ {} added {}", favorite.key, favorite.added_at.format("%Y-%m-%d"));
        }
        FavoriteCommand::Remove { verse } => {
            if db.remove_favorite(verse)? {
                println!("Removed {verse} from favorites");
            } else {
                println!("{verse} was not a favorite");
            }
        }
        FavoriteCommand::Toggle { verse } => {
            let stored = require_verse(db, verse)?;
            let favorite = FavoriteVerse::new(verse, stored.original_text, stored.translation);
            if db.toggle_favorite(&favorite)? {
                println!("⭐ {verse}");
            } else {
                println!("Removed {verse} from favorites");
            }
        }
        FavoriteCommand::List => {
            let favorites = db.list_favorites()?;
            if favorites.is_empty() {
                println!("No favorites yet.");
            }
            for favorite in &favorites {
                println!(
                    "{:<8} {}  {}",
                    favorite.key.to_string(),
                    favorite.added_at.format("%Y-%m-%d"),
                    truncate(&favorite.translation, 70)
                );
            }
        }
    }
    Ok(())
}

pub fn run_memorize(db: &Database, command: MemorizeCommand) -> Result<()> {
    match command {
        MemorizeCommand::Add { verse } => {
            let stored = require_verse(db, verse)?;
            if db.mark_memorized(&MemorizedVerse::new(verse, stored.original_text))? {
                println!("🧠 Marked {verse} as memorized");
            } else {
                println!("{verse} is already memorized");
            }
        }
        MemorizeCommand::Remove { verse } => {
            if db.unmark_memorized(verse)? {
                println!("Unmarked {verse}");
            } else {
                println!("{verse} was not marked as memorized");
            }
        }
        MemorizeCommand::List => {
            let memorized = db.list_memorized()?;
            if memorized.is_empty() {
                println!("Nothing memorized yet.");
            }
            for entry in &memorized {
                println!(
                    "{:<8} {}  {}",
                    entry.key.to_string(),
                    entry.memorized_at.format("%Y-%m-%d"),
                    truncate(&entry.original_text, 60)
                );
            }
            if !memorized.is_empty() {
                println!("\n{} verses memorized", memorized.len());
            }
        }
    }
    Ok(())
}
