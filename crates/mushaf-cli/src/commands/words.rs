use anyhow::{Context, Result};

use mushaf_core::chapter_meta;
use mushaf_core::model::{SavedWord, SavedWordId, VerseKey};
use mushaf_core::schema::Database;
use mushaf_search::filter_saved_words;

use super::require_verse;

#[derive(Debug, clap::Subcommand)]
pub enum WordCommand {
    /// Save a word from a verse's word-by-word breakdown
    Save {
        #[arg(value_parser = crate::parse_verse_key)]
        verse: VerseKey,

        /// Zero-based word position, as shown by `mushaf read --words`
        position: u16,

        /// Notes to keep with the word
        #[arg(long)]
        notes: Option<String>,
    },
    /// List saved words, newest first
    List {
        /// Only words whose text, translation, or chapter match
        query: Option<String>,

        /// Hide mastered words
        #[arg(long)]
        unmastered: bool,
    },
    /// Flip the mastered flag of a word
    Master { id: SavedWordId },
    /// Replace the notes on a word
    Notes { id: SavedWordId, notes: String },
    /// Remove a word from the list
    Delete { id: SavedWordId },
}

pub fn run(db: &Database, command: WordCommand) -> Result<()> {
    match command {
        WordCommand::Save {
            verse,
            position,
            notes,
        } => {
            let stored = require_verse(db, verse)?;
            let word = stored
                .words
                .iter()
                .find(|w| w.position == position)
                .with_context(|| {
                    format!("{verse} has no word at position {position} ({} words)", stored.words.len())
                })?;
            let meta = chapter_meta(verse.chapter)?;
            let mut saved = SavedWord::new(
                word.original.clone(),
                word.translation.clone(),
                verse,
                meta.name,
                position,
            );
            if let Some(notes) = notes {
                saved = saved.with_notes(notes);
            }
            db.insert_saved_word(&saved)?;
            println!("✓ Saved '{}' ({}) as {}", saved.original, saved.translation, saved.id);
        }
        WordCommand::List { query, unmastered } => {
            let words = db.list_saved_words()?;
            let shown = filter_saved_words(&words, query.as_deref().unwrap_or_default(), unmastered);
            if shown.is_empty() {
                println!("No saved words.");
            }
            for word in &shown {
                println!(
                    "{} {}  {} · {}  ({} {}, word {})",
                    if word.mastered { "✓" } else { " " },
                    word.id,
                    word.original,
                    word.translation,
                    word.chapter_name,
                    word.key,
                    word.position
                );
                if !word.notes.is_empty() {
                    println!("      {}", word.notes);
                }
            }
            let mastered = words.iter().filter(|w| w.mastered).count();
            if !words.is_empty() {
                println!("\n{mastered} of {} words mastered", words.len());
            }
        }
        WordCommand::Master { id } => {
            let mastered = db.toggle_word_mastered(id)?;
            println!(
                "{} {id}",
                if mastered { "✓ Mastered" } else { "Not mastered:" }
            );
        }
        WordCommand::Notes { id, notes } => {
            db.update_word_notes(id, &notes)?;
            println!("✓ Updated notes for {id}");
        }
        WordCommand::Delete { id } => {
            db.delete_saved_word(id)?;
            println!("✓ Removed {id}");
        }
    }
    Ok(())
}
