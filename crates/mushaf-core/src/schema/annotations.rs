//! Personal annotations: favorites, notes and categories, memorization
//! markers, and saved words.
//!
//! Every record here carries its own `(chapter, verse)` copy and text
//! snapshot, so none of these tables reference the content tables.

use chrono::Utc;
use rusqlite::OptionalExtension;

use crate::error::{Error, Result};
use crate::model::{
    Category, CategoryId, FavoriteVerse, MemorizedVerse, Note, NoteId, NoteWithCategory,
    SavedWord, SavedWordId, VerseKey,
};

use super::db::{format_timestamp, parse_column, parse_timestamp, Database};

const NOTE_COLUMNS: &str = "n.id, n.chapter_number, n.verse_number, n.original_text, n.translation,
     n.text, n.category_id, n.created_at, n.updated_at,
     c.id, c.name, c.color, c.created_at";

// Favorite CRUD
impl Database {
    /// Star a verse. Starring an already-starred verse returns the existing
    /// record unchanged.
    pub fn add_favorite(&self, favorite: &FavoriteVerse) -> Result<FavoriteVerse> {
        self.conn().execute(
            "INSERT OR IGNORE INTO favorites (id, chapter_number, verse_number, original_text, translation, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                favorite.id.to_string(),
                favorite.key.chapter,
                favorite.key.verse,
                favorite.original_text,
                favorite.translation,
                format_timestamp(&favorite.added_at),
            ],
        )?;
        self.get_favorite(favorite.key)?.ok_or_else(|| Error::NotFound {
            entity: "favorite",
            id: favorite.key.to_string(),
        })
    }

    pub fn get_favorite(&self, key: VerseKey) -> Result<Option<FavoriteVerse>> {
        let favorite = self
            .conn()
            .query_row(
                "SELECT id, chapter_number, verse_number, original_text, translation, added_at
                 FROM favorites
                 WHERE chapter_number = ?1 AND verse_number = ?2",
                rusqlite::params![key.chapter, key.verse],
                row_to_favorite,
            )
            .optional()?;
        Ok(favorite)
    }

    pub fn is_favorite(&self, key: VerseKey) -> Result<bool> {
        Ok(self.get_favorite(key)?.is_some())
    }

    /// Unstar a verse. Returns whether a favorite was removed.
    pub fn remove_favorite(&self, key: VerseKey) -> Result<bool> {
        let removed = self.conn().execute(
            "DELETE FROM favorites WHERE chapter_number = ?1 AND verse_number = ?2",
            rusqlite::params![key.chapter, key.verse],
        )?;
        Ok(removed > 0)
    }

    /// Flip the favorite state of a verse. Returns `true` if it is now a
    /// favorite.
    pub fn toggle_favorite(&self, favorite: &FavoriteVerse) -> Result<bool> {
        if self.remove_favorite(favorite.key)? {
            Ok(false)
        } else {
            self.add_favorite(favorite)?;
            Ok(true)
        }
    }

    /// All favorites, most recently added first.
    pub fn list_favorites(&self) -> Result<Vec<FavoriteVerse>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, chapter_number, verse_number, original_text, translation, added_at
             FROM favorites
             ORDER BY added_at DESC, rowid DESC",
        )?;
        let favorites = stmt
            .query_map([], row_to_favorite)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(favorites)
    }
}

// Category CRUD
impl Database {
    pub fn insert_category(&self, category: &Category) -> Result<()> {
        self.conn().execute(
            "INSERT INTO categories (id, name, color, created_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                category.id.to_string(),
                category.name,
                category.color,
                format_timestamp(&category.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let category = self
            .conn()
            .query_row(
                "SELECT id, name, color, created_at FROM categories WHERE id = ?1",
                [id.to_string()],
                |row| row_to_category(row, 0),
            )
            .optional()?;
        Ok(category)
    }

    /// Case-insensitive lookup by name.
    pub fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let category = self
            .conn()
            .query_row(
                "SELECT id, name, color, created_at FROM categories
                 WHERE name = ?1 COLLATE NOCASE
                 ORDER BY created_at
                 LIMIT 1",
                [name.trim()],
                |row| row_to_category(row, 0),
            )
            .optional()?;
        Ok(category)
    }

    /// All categories, sorted by name.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, color, created_at FROM categories
             ORDER BY name COLLATE NOCASE, created_at",
        )?;
        let categories = stmt
            .query_map([], |row| row_to_category(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    /// Delete a category. Its notes are kept and become uncategorized.
    ///
    /// Returns the number of notes that lost their category.
    pub fn delete_category(&self, id: CategoryId) -> Result<usize> {
        let tx = self.conn().unchecked_transaction()?;
        let detached = tx.execute(
            "UPDATE notes SET category_id = NULL WHERE category_id = ?1",
            [id.to_string()],
        )?;
        let deleted = tx.execute("DELETE FROM categories WHERE id = ?1", [id.to_string()])?;
        if deleted == 0 {
            return Err(Error::NotFound {
                entity: "category",
                id: id.to_string(),
            });
        }
        tx.commit()?;
        log::debug!("Deleted category {id}, detached {detached} notes");
        Ok(detached)
    }

    fn ensure_category_exists(&self, id: Option<CategoryId>) -> Result<()> {
        if let Some(id) = id {
            if self.get_category(id)?.is_none() {
                return Err(Error::NotFound {
                    entity: "category",
                    id: id.to_string(),
                });
            }
        }
        Ok(())
    }
}

// Note CRUD
impl Database {
    /// Store a new note. A referenced category must exist.
    pub fn insert_note(&self, note: &Note) -> Result<()> {
        self.ensure_category_exists(note.category_id)?;
        self.conn().execute(
            "INSERT INTO notes (id, chapter_number, verse_number, original_text, translation,
                                text, category_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                note.id.to_string(),
                note.key.chapter,
                note.key.verse,
                note.original_text,
                note.translation,
                note.text,
                note.category_id.map(|id| id.to_string()),
                format_timestamp(&note.created_at),
                format_timestamp(&note.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Replace the text of a note and bump its `updated_at`.
    pub fn update_note_text(&self, id: NoteId, text: &str) -> Result<()> {
        let updated = self.conn().execute(
            "UPDATE notes SET text = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![text, format_timestamp(&Utc::now()), id.to_string()],
        )?;
        require_row(updated, "note", id)
    }

    /// Assign or clear the category of a note.
    pub fn set_note_category(&self, id: NoteId, category_id: Option<CategoryId>) -> Result<()> {
        self.ensure_category_exists(category_id)?;
        let updated = self.conn().execute(
            "UPDATE notes SET category_id = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![
                category_id.map(|c| c.to_string()),
                format_timestamp(&Utc::now()),
                id.to_string()
            ],
        )?;
        require_row(updated, "note", id)
    }

    pub fn delete_note(&self, id: NoteId) -> Result<()> {
        let deleted = self
            .conn()
            .execute("DELETE FROM notes WHERE id = ?1", [id.to_string()])?;
        require_row(deleted, "note", id)
    }

    pub fn get_note(&self, id: NoteId) -> Result<Option<NoteWithCategory>> {
        let sql = format!(
            "SELECT {NOTE_COLUMNS}
             FROM notes n LEFT JOIN categories c ON c.id = n.category_id
             WHERE n.id = ?1"
        );
        let note = self
            .conn()
            .query_row(&sql, [id.to_string()], row_to_note)
            .optional()?;
        Ok(note)
    }

    /// Notes, most recently created first, optionally limited to one category.
    pub fn list_notes(&self, category: Option<CategoryId>) -> Result<Vec<NoteWithCategory>> {
        let sql = format!(
            "SELECT {NOTE_COLUMNS}
             FROM notes n LEFT JOIN categories c ON c.id = n.category_id
             WHERE ?1 IS NULL OR n.category_id = ?1
             ORDER BY n.created_at DESC, n.rowid DESC"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let notes = stmt
            .query_map([category.map(|c| c.to_string())], row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Every note, oldest first, as written to an export.
    pub fn list_notes_for_export(&self) -> Result<Vec<NoteWithCategory>> {
        let sql = format!(
            "SELECT {NOTE_COLUMNS}
             FROM notes n LEFT JOIN categories c ON c.id = n.category_id
             ORDER BY n.created_at, n.rowid"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let notes = stmt
            .query_map([], row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Notes attached to one verse, oldest first.
    pub fn notes_for_verse(&self, key: VerseKey) -> Result<Vec<NoteWithCategory>> {
        let sql = format!(
            "SELECT {NOTE_COLUMNS}
             FROM notes n LEFT JOIN categories c ON c.id = n.category_id
             WHERE n.chapter_number = ?1 AND n.verse_number = ?2
             ORDER BY n.created_at, n.rowid"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let notes = stmt
            .query_map(rusqlite::params![key.chapter, key.verse], row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }
}

// Memorized CRUD
impl Database {
    /// Mark a verse memorized. Returns `false` if it already was.
    pub fn mark_memorized(&self, memorized: &MemorizedVerse) -> Result<bool> {
        let inserted = self.conn().execute(
            "INSERT OR IGNORE INTO memorized_verses (id, chapter_number, verse_number, original_text, memorized_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                memorized.id.to_string(),
                memorized.key.chapter,
                memorized.key.verse,
                memorized.original_text,
                format_timestamp(&memorized.memorized_at),
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Clear the memorized marker. Returns whether one existed.
    pub fn unmark_memorized(&self, key: VerseKey) -> Result<bool> {
        let removed = self.conn().execute(
            "DELETE FROM memorized_verses WHERE chapter_number = ?1 AND verse_number = ?2",
            rusqlite::params![key.chapter, key.verse],
        )?;
        Ok(removed > 0)
    }

    pub fn is_memorized(&self, key: VerseKey) -> Result<bool> {
        let exists: bool = self.conn().query_row(
            "SELECT EXISTS (SELECT 1 FROM memorized_verses WHERE chapter_number = ?1 AND verse_number = ?2)",
            rusqlite::params![key.chapter, key.verse],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Memorized verses in canonical order.
    pub fn list_memorized(&self) -> Result<Vec<MemorizedVerse>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, chapter_number, verse_number, original_text, memorized_at
             FROM memorized_verses
             ORDER BY chapter_number, verse_number",
        )?;
        let verses = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let memorized_at: String = row.get(4)?;
                Ok(MemorizedVerse {
                    id: parse_column(0, &id)?,
                    key: VerseKey::new(row.get(1)?, row.get(2)?),
                    original_text: row.get(3)?,
                    memorized_at: parse_timestamp(4, &memorized_at)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(verses)
    }

    pub fn count_memorized(&self) -> Result<u32> {
        let count: u32 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM memorized_verses", [], |row| row.get(0))?;
        Ok(count)
    }
}

// Saved word CRUD
impl Database {
    pub fn insert_saved_word(&self, word: &SavedWord) -> Result<()> {
        self.conn().execute(
            "INSERT INTO saved_words (id, original, translation, chapter_number, chapter_name,
                                      verse_number, position, notes, mastered, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                word.id.to_string(),
                word.original,
                word.translation,
                word.key.chapter,
                word.chapter_name,
                word.key.verse,
                word.position,
                word.notes,
                word.mastered,
                format_timestamp(&word.saved_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_saved_word(&self, id: SavedWordId) -> Result<Option<SavedWord>> {
        let word = self
            .conn()
            .query_row(
                "SELECT id, original, translation, chapter_number, chapter_name,
                        verse_number, position, notes, mastered, saved_at
                 FROM saved_words WHERE id = ?1",
                [id.to_string()],
                row_to_saved_word,
            )
            .optional()?;
        Ok(word)
    }

    /// Saved words, most recently saved first.
    pub fn list_saved_words(&self) -> Result<Vec<SavedWord>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, original, translation, chapter_number, chapter_name,
                    verse_number, position, notes, mastered, saved_at
             FROM saved_words
             ORDER BY saved_at DESC, rowid DESC",
        )?;
        let words = stmt
            .query_map([], row_to_saved_word)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(words)
    }

    pub fn set_word_mastered(&self, id: SavedWordId, mastered: bool) -> Result<()> {
        let updated = self.conn().execute(
            "UPDATE saved_words SET mastered = ?1 WHERE id = ?2",
            rusqlite::params![mastered, id.to_string()],
        )?;
        require_row(updated, "saved word", id)
    }

    /// Flip the mastered flag. Returns the new value.
    pub fn toggle_word_mastered(&self, id: SavedWordId) -> Result<bool> {
        let word = self.get_saved_word(id)?.ok_or_else(|| Error::NotFound {
            entity: "saved word",
            id: id.to_string(),
        })?;
        let mastered = !word.mastered;
        self.set_word_mastered(id, mastered)?;
        Ok(mastered)
    }

    pub fn update_word_notes(&self, id: SavedWordId, notes: &str) -> Result<()> {
        let updated = self.conn().execute(
            "UPDATE saved_words SET notes = ?1 WHERE id = ?2",
            rusqlite::params![notes, id.to_string()],
        )?;
        require_row(updated, "saved word", id)
    }

    pub fn delete_saved_word(&self, id: SavedWordId) -> Result<()> {
        let deleted = self
            .conn()
            .execute("DELETE FROM saved_words WHERE id = ?1", [id.to_string()])?;
        require_row(deleted, "saved word", id)
    }
}

fn require_row(changed: usize, entity: &'static str, id: impl ToString) -> Result<()> {
    if changed == 0 {
        Err(Error::NotFound {
            entity,
            id: id.to_string(),
        })
    } else {
        Ok(())
    }
}

fn row_to_favorite(row: &rusqlite::Row) -> rusqlite::Result<FavoriteVerse> {
    let id: String = row.get(0)?;
    let added_at: String = row.get(5)?;
    Ok(FavoriteVerse {
        id: parse_column(0, &id)?,
        key: VerseKey::new(row.get(1)?, row.get(2)?),
        original_text: row.get(3)?,
        translation: row.get(4)?,
        added_at: parse_timestamp(5, &added_at)?,
    })
}

fn row_to_category(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<Category> {
    let id: String = row.get(offset)?;
    let created_at: String = row.get(offset + 3)?;
    Ok(Category {
        id: parse_column(offset, &id)?,
        name: row.get(offset + 1)?,
        color: row.get(offset + 2)?,
        created_at: parse_timestamp(offset + 3, &created_at)?,
    })
}

fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<NoteWithCategory> {
    let id: String = row.get(0)?;
    let category_id: Option<String> = row.get(6)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    let note = Note {
        id: parse_column(0, &id)?,
        key: VerseKey::new(row.get(1)?, row.get(2)?),
        original_text: row.get(3)?,
        translation: row.get(4)?,
        text: row.get(5)?,
        category_id: category_id
            .as_deref()
            .map(|c| parse_column(6, c))
            .transpose()?,
        created_at: parse_timestamp(7, &created_at)?,
        updated_at: parse_timestamp(8, &updated_at)?,
    };

    let joined: Option<String> = row.get(9)?;
    let category = match joined {
        Some(_) => Some(row_to_category(row, 9)?),
        None => None,
    };

    Ok(NoteWithCategory { note, category })
}

fn row_to_saved_word(row: &rusqlite::Row) -> rusqlite::Result<SavedWord> {
    let id: String = row.get(0)?;
    let saved_at: String = row.get(9)?;
    Ok(SavedWord {
        id: parse_column(0, &id)?,
        original: row.get(1)?,
        translation: row.get(2)?,
        key: VerseKey::new(row.get(3)?, row.get(5)?),
        chapter_name: row.get(4)?,
        position: row.get(6)?,
        notes: row.get(7)?,
        mastered: row.get(8)?,
        saved_at: parse_timestamp(9, &saved_at)?,
    })
}
