use anyhow::{Context, Result};
use std::path::PathBuf;

use mushaf_core::model::{Category, CategoryId, Note, NoteId, NoteWithCategory, VerseKey};
use mushaf_core::schema::Database;

use super::require_verse;
use crate::display::truncate;

#[derive(Debug, clap::Subcommand)]
pub enum NoteCommand {
    /// Write a note on a verse
    Add {
        #[arg(value_parser = crate::parse_verse_key)]
        verse: VerseKey,

        text: String,

        /// Category name
        #[arg(long)]
        category: Option<String>,
    },
    /// Change the text or category of a note
    Edit {
        id: NoteId,

        /// New note text
        text: Option<String>,

        /// Move the note to this category
        #[arg(long, conflicts_with = "no_category")]
        category: Option<String>,

        /// Remove the note from its category
        #[arg(long)]
        no_category: bool,
    },
    /// Delete a note
    Delete { id: NoteId },
    /// List notes, newest first
    List {
        /// Only notes in this category
        #[arg(long)]
        category: Option<String>,

        /// Only notes on this verse
        #[arg(long, value_parser = crate::parse_verse_key)]
        verse: Option<VerseKey>,
    },
    /// Export all notes to a CSV file
    Export { path: PathBuf },
}

#[derive(Debug, clap::Subcommand)]
pub enum CategoryCommand {
    /// Create a category
    Add {
        name: String,

        /// Display color as #RRGGBB (default: picked from the palette)
        #[arg(long)]
        color: Option<String>,
    },
    /// List categories
    List,
    /// Delete a category; its notes become uncategorized
    Delete { name: String },
}

fn category_by_name(db: &Database, name: &str) -> Result<Category> {
    db.find_category_by_name(name)?
        .with_context(|| format!("No category named '{name}'"))
}

fn print_note(entry: &NoteWithCategory) {
    let note = &entry.note;
    println!(
        "{}  {:<8} [{}] {}",
        note.id,
        note.key.to_string(),
        entry.category_name(),
        note.updated_at.format("%Y-%m-%d %H:%M")
    );
    println!("    {}", truncate(&note.translation, 70));
    println!("    📝 {}", note.text);
}

pub fn run_note(db: &Database, command: NoteCommand) -> Result<()> {
    match command {
        NoteCommand::Add {
            verse,
            text,
            category,
        } => {
            if text.trim().is_empty() {
                anyhow::bail!("Note text is empty");
            }
            let stored = require_verse(db, verse)?;
            let mut note = Note::new(verse, stored.original_text, stored.translation, text);
            if let Some(name) = category {
                note = note.with_category(category_by_name(db, &name)?.id);
            }
            db.insert_note(&note)?;
            println!("✓ Added note {} on {}", note.id, verse);
        }
        NoteCommand::Edit {
            id,
            text,
            category,
            no_category,
        } => {
            if text.is_none() && category.is_none() && !no_category {
                anyhow::bail!("Nothing to change: give new text, --category, or --no-category");
            }
            if let Some(text) = text {
                db.update_note_text(id, &text)?;
            }
            if no_category {
                db.set_note_category(id, None)?;
            } else if let Some(name) = category {
                let category = category_by_name(db, &name)?;
                db.set_note_category(id, Some(category.id))?;
            }
            if let Some(updated) = db.get_note(id)? {
                print_note(&updated);
            }
        }
        NoteCommand::Delete { id } => {
            db.delete_note(id)?;
            println!("✓ Deleted note {id}");
        }
        NoteCommand::List { category, verse } => {
            let notes = match (verse, category) {
                (Some(key), category) => {
                    let only: Option<CategoryId> = match category {
                        Some(name) => Some(category_by_name(db, &name)?.id),
                        None => None,
                    };
                    db.notes_for_verse(key)?
                        .into_iter()
                        .filter(|n| only.is_none() || n.note.category_id == only)
                        .collect()
                }
                (None, Some(name)) => db.list_notes(Some(category_by_name(db, &name)?.id))?,
                (None, None) => db.list_notes(None)?,
            };
            if notes.is_empty() {
                println!("No notes.");
            }
            for entry in &notes {
                print_note(entry);
                println!();
            }
        }
        NoteCommand::Export { path } => {
            let written = mushaf_etl::export_notes(db, &path)?;
            println!("✓ Exported {written} notes to {}", path.display());
        }
    }
    Ok(())
}

pub fn run_category(db: &Database, command: CategoryCommand) -> Result<()> {
    match command {
        CategoryCommand::Add { name, color } => {
            if db.find_category_by_name(&name)?.is_some() {
                anyhow::bail!("Category '{}' already exists", name.trim());
            }
            let color = match color {
                Some(c) => c
                    .parse::<mushaf_core::Color>()
                    .with_context(|| format!("Invalid color '{c}'"))?
                    .as_str()
                    .to_string(),
                None => Category::palette_color(&name).to_string(),
            };
            let category = Category::new(name, color)?;
            db.insert_category(&category)?;
            println!("✓ Created category {} ({})", category.name, category.color);
        }
        CategoryCommand::List => {
            let categories = db.list_categories()?;
            if categories.is_empty() {
                println!("No categories.");
            }
            for category in &categories {
                println!("{}  {}", category.color, category.name);
            }
        }
        CategoryCommand::Delete { name } => {
            let category = category_by_name(db, &name)?;
            let detached = db.delete_category(category.id)?;
            println!(
                "✓ Deleted category {} ({detached} notes now uncategorized)",
                category.name
            );
        }
    }
    Ok(())
}
