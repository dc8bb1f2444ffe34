use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;
use crate::model::{Chapter, Origin, Verse, VerseKey, Word};

use super::migrations::MIGRATIONS;

/// A database connection holding content and annotations.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

/// Row counts written by [`Database::replace_content`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentCounts {
    pub chapters: usize,
    pub verses: usize,
    pub words: usize,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.configure()?;
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.configure()?;
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    // Foreign keys are per-connection in SQLite, so this runs on every open.
    fn configure(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                let tx = self.conn.unchecked_transaction()?;
                tx.execute_batch(migration.sql)?;
                tx.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
                tx.commit()?;
            }
        }

        Ok(())
    }
}

// Content
impl Database {
    /// Replace all chapters, verses, and words in a single transaction.
    ///
    /// Annotation tables are left alone: they key on `(chapter, verse)`
    /// values and survive a reload.
    pub fn replace_content(&self, chapters: &[Chapter]) -> Result<ContentCounts> {
        let tx = self.conn.unchecked_transaction()?;
        let mut counts = ContentCounts::default();

        tx.execute("DELETE FROM words", [])?;
        tx.execute("DELETE FROM verses", [])?;
        tx.execute("DELETE FROM chapters", [])?;

        {
            let mut insert_chapter = tx.prepare(
                "INSERT INTO chapters (number, name, original_name, origin, verse_count)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let mut insert_verse = tx.prepare(
                "INSERT INTO verses (chapter_number, verse_number, translation, original_text, footnote)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let mut insert_word = tx.prepare(
                "INSERT INTO words (verse_id, position, original, translation)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            for chapter in chapters {
                insert_chapter.execute(rusqlite::params![
                    chapter.number,
                    chapter.name,
                    chapter.original_name,
                    chapter.origin.label(),
                    chapter.verse_count,
                ])?;
                counts.chapters += 1;

                for verse in &chapter.verses {
                    let verse_id = insert_verse.insert(rusqlite::params![
                        verse.key.chapter,
                        verse.key.verse,
                        verse.translation,
                        verse.original_text,
                        verse.footnote,
                    ])?;
                    counts.verses += 1;

                    for word in &verse.words {
                        insert_word.execute(rusqlite::params![
                            verse_id,
                            word.position,
                            word.original,
                            word.translation,
                        ])?;
                        counts.words += 1;
                    }
                }
            }
        }

        tx.commit()?;
        log::info!(
            "Stored {} chapters, {} verses, {} words",
            counts.chapters,
            counts.verses,
            counts.words
        );
        Ok(counts)
    }

    /// Load every chapter with its verses and words, in canonical order.
    pub fn load_chapters(&self) -> Result<Vec<Chapter>> {
        let mut stmt = self.conn.prepare(
            "SELECT number, name, original_name, origin, verse_count
             FROM chapters
             ORDER BY number",
        )?;
        let mut chapters = stmt
            .query_map([], row_to_chapter)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut verses_by_chapter = self.load_verses(None)?;
        for chapter in &mut chapters {
            if let Some(verses) = verses_by_chapter.remove(&chapter.number) {
                chapter.verses = verses;
            }
        }

        Ok(chapters)
    }

    /// Load a single chapter with its verses and words.
    pub fn load_chapter(&self, number: u16) -> Result<Option<Chapter>> {
        let chapter = self
            .conn
            .query_row(
                "SELECT number, name, original_name, origin, verse_count
                 FROM chapters
                 WHERE number = ?1",
                [number],
                row_to_chapter,
            )
            .optional()?;

        let Some(mut chapter) = chapter else {
            return Ok(None);
        };
        chapter.verses = self
            .load_verses(Some(number))?
            .remove(&number)
            .unwrap_or_default();
        Ok(Some(chapter))
    }

    /// Look up one verse by key.
    pub fn get_verse(&self, key: VerseKey) -> Result<Option<Verse>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, chapter_number, verse_number, translation, original_text, footnote
                 FROM verses
                 WHERE chapter_number = ?1 AND verse_number = ?2",
                rusqlite::params![key.chapter, key.verse],
                row_to_verse,
            )
            .optional()?;

        let Some((verse_id, mut verse)) = row else {
            return Ok(None);
        };
        verse.words = self
            .load_words(Some(verse_id))?
            .remove(&verse_id)
            .unwrap_or_default();
        Ok(Some(verse))
    }

    /// Total number of stored verses.
    pub fn count_verses(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM verses", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Whether any chapters have been imported.
    pub fn has_content(&self) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM chapters)",
            [],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn load_verses(&self, chapter: Option<u16>) -> Result<HashMap<u16, Vec<Verse>>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, chapter_number, verse_number, translation, original_text, footnote
             FROM verses
             WHERE ?1 IS NULL OR chapter_number = ?1
             ORDER BY chapter_number, verse_number",
        )?;
        let rows = stmt
            .query_map([chapter], row_to_verse)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut words = if chapter.is_some() && rows.is_empty() {
            HashMap::new()
        } else {
            self.load_words_for_chapter(chapter)?
        };

        let mut by_chapter: HashMap<u16, Vec<Verse>> = HashMap::new();
        for (verse_id, mut verse) in rows {
            verse.words = words.remove(&verse_id).unwrap_or_default();
            by_chapter.entry(verse.key.chapter).or_default().push(verse);
        }
        Ok(by_chapter)
    }

    fn load_words_for_chapter(&self, chapter: Option<u16>) -> Result<HashMap<i64, Vec<Word>>> {
        let mut stmt = self.conn.prepare(
            "SELECT w.verse_id, w.position, w.original, w.translation
             FROM words w
             JOIN verses v ON v.id = w.verse_id
             WHERE ?1 IS NULL OR v.chapter_number = ?1
             ORDER BY w.verse_id, w.position",
        )?;
        let words = collect_words(stmt.query_map([chapter], row_to_word)?);
        words
    }

    fn load_words(&self, verse_id: Option<i64>) -> Result<HashMap<i64, Vec<Word>>> {
        let mut stmt = self.conn.prepare(
            "SELECT verse_id, position, original, translation
             FROM words
             WHERE ?1 IS NULL OR verse_id = ?1
             ORDER BY verse_id, position",
        )?;
        let words = collect_words(stmt.query_map([verse_id], row_to_word)?);
        words
    }
}

fn collect_words(
    rows: impl Iterator<Item = rusqlite::Result<(i64, Word)>>,
) -> Result<HashMap<i64, Vec<Word>>> {
    let mut words: HashMap<i64, Vec<Word>> = HashMap::new();
    for row in rows {
        let (verse_id, word) = row?;
        words.entry(verse_id).or_default().push(word);
    }
    Ok(words)
}

fn row_to_chapter(row: &rusqlite::Row) -> rusqlite::Result<Chapter> {
    let origin: String = row.get(3)?;
    Ok(Chapter {
        number: row.get(0)?,
        name: row.get(1)?,
        original_name: row.get(2)?,
        origin: parse_column::<Origin>(3, &origin)?,
        verse_count: row.get(4)?,
        verses: Vec::new(),
    })
}

fn row_to_verse(row: &rusqlite::Row) -> rusqlite::Result<(i64, Verse)> {
    let verse = Verse {
        key: VerseKey::new(row.get(1)?, row.get(2)?),
        translation: row.get(3)?,
        original_text: row.get(4)?,
        footnote: row.get(5)?,
        words: Vec::new(),
    };
    Ok((row.get(0)?, verse))
}

fn row_to_word(row: &rusqlite::Row) -> rusqlite::Result<(i64, Word)> {
    Ok((
        row.get(0)?,
        Word {
            position: row.get(1)?,
            original: row.get(2)?,
            translation: row.get(3)?,
        },
    ))
}

/// Timestamps are stored as fixed-width RFC 3339 so they sort as text.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parse a text column through `FromStr`, reporting failures as conversion errors.
pub(crate) fn parse_column<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{chapter_meta, CHAPTERS};

    fn sample_chapters() -> Vec<Chapter> {
        CHAPTERS
            .iter()
            .map(|meta| {
                let chapter = Chapter::from_meta(meta);
                if meta.number == 1 {
                    chapter.with_verses(vec![
                        Verse::new(VerseKey::new(1, 2), "All praise is due to Allah", "الْحَمْدُ لِلَّهِ"),
                        Verse::new(VerseKey::new(1, 1), "In the name of Allah", "بِسْمِ اللَّهِ")
                            .with_footnote("Basmalah"),
                    ])
                } else {
                    chapter
                }
            })
            .collect()
    }

    #[test]
    fn test_database_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, i64::try_from(MIGRATIONS.len()).unwrap());
    }

    #[test]
    fn test_reopen_does_not_reapply_migrations() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mushaf.db");
        drop(Database::open(&path).unwrap());
        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, i64::try_from(MIGRATIONS.len()).unwrap());
    }

    #[test]
    fn test_content_round_trip() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.has_content().unwrap());

        let counts = db.replace_content(&sample_chapters()).unwrap();
        assert_eq!(
            counts,
            ContentCounts {
                chapters: 114,
                verses: 2,
                words: 2
            }
        );

        let chapters = db.load_chapters().unwrap();
        assert_eq!(chapters, sample_chapters());
        assert!(db.has_content().unwrap());
        assert_eq!(db.count_verses().unwrap(), 2);
    }

    #[test]
    fn test_load_single_chapter_and_verse() {
        let db = Database::open_in_memory().unwrap();
        db.replace_content(&sample_chapters()).unwrap();

        let fatihah = db.load_chapter(1).unwrap().unwrap();
        assert_eq!(fatihah.verse_numbers(), vec![1, 2]);
        assert_eq!(fatihah.verses[0].footnote.as_deref(), Some("Basmalah"));

        let empty = db.load_chapter(114).unwrap().unwrap();
        assert!(empty.verses.is_empty());
        assert_eq!(empty.name, chapter_meta(114).unwrap().name);

        let verse = db.get_verse(VerseKey::new(1, 2)).unwrap().unwrap();
        assert_eq!(verse.words.len(), 1);
        assert!(db.get_verse(VerseKey::new(1, 3)).unwrap().is_none());
    }

    #[test]
    fn test_replace_content_overwrites() {
        let db = Database::open_in_memory().unwrap();
        db.replace_content(&sample_chapters()).unwrap();

        let reloaded: Vec<Chapter> = CHAPTERS.iter().map(Chapter::from_meta).collect();
        db.replace_content(&reloaded).unwrap();
        assert_eq!(db.count_verses().unwrap(), 0);
        assert_eq!(db.load_chapters().unwrap().len(), 114);
    }

    #[test]
    fn test_verse_requires_chapter_row() {
        let db = Database::open_in_memory().unwrap();
        let result = db.conn().execute(
            "INSERT INTO verses (chapter_number, verse_number, translation, original_text)
             VALUES (5, 1, 't', 'o')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let now = Utc::now();
        let text = format_timestamp(&now);
        assert!(text.ends_with('Z'));
        let parsed = parse_timestamp(0, &text).unwrap();
        assert_eq!(parsed, now);
        assert!(parse_timestamp(0, "yesterday").is_err());
    }
}
