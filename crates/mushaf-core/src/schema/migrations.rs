/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Content: rebuilt wholesale on every import
CREATE TABLE IF NOT EXISTS chapters (
    number INTEGER PRIMARY KEY CHECK (number BETWEEN 1 AND 114),
    name TEXT NOT NULL,
    original_name TEXT NOT NULL,
    origin TEXT NOT NULL CHECK (origin IN ('Meccan', 'Medinan')),
    verse_count INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS verses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chapter_number INTEGER NOT NULL REFERENCES chapters(number) ON DELETE CASCADE,
    verse_number INTEGER NOT NULL CHECK (verse_number >= 1),
    translation TEXT NOT NULL,
    original_text TEXT NOT NULL,
    footnote TEXT,
    UNIQUE (chapter_number, verse_number)
);

CREATE TABLE IF NOT EXISTS words (
    verse_id INTEGER NOT NULL REFERENCES verses(id) ON DELETE CASCADE,
    position INTEGER NOT NULL CHECK (position >= 0),
    original TEXT NOT NULL,
    translation TEXT NOT NULL,
    PRIMARY KEY (verse_id, position)
);

-- Annotations: keyed by value, never reference content rows
CREATE TABLE IF NOT EXISTS favorites (
    id TEXT PRIMARY KEY,
    chapter_number INTEGER NOT NULL,
    verse_number INTEGER NOT NULL,
    original_text TEXT NOT NULL,
    translation TEXT NOT NULL,
    added_at TEXT NOT NULL,
    UNIQUE (chapter_number, verse_number)
);

CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    color TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY,
    chapter_number INTEGER NOT NULL,
    verse_number INTEGER NOT NULL,
    original_text TEXT NOT NULL,
    translation TEXT NOT NULL,
    text TEXT NOT NULL,
    category_id TEXT REFERENCES categories(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notes_category_id ON notes(category_id);
CREATE INDEX IF NOT EXISTS idx_notes_verse ON notes(chapter_number, verse_number);

CREATE TABLE IF NOT EXISTS memorized_verses (
    id TEXT PRIMARY KEY,
    chapter_number INTEGER NOT NULL,
    verse_number INTEGER NOT NULL,
    original_text TEXT NOT NULL,
    memorized_at TEXT NOT NULL,
    UNIQUE (chapter_number, verse_number)
);

CREATE TABLE IF NOT EXISTS verse_views (
    chapter_number INTEGER NOT NULL,
    verse_number INTEGER NOT NULL,
    viewed_at TEXT NOT NULL,
    PRIMARY KEY (chapter_number, verse_number)
);

CREATE TABLE IF NOT EXISTS reading_progress (
    chapter_number INTEGER PRIMARY KEY,
    chapter_name TEXT NOT NULL,
    percentage REAL NOT NULL CHECK (percentage BETWEEN 0 AND 100),
    last_read_at TEXT NOT NULL
);
"#;

const MIGRATION_002: &str = r#"
CREATE TABLE IF NOT EXISTS saved_words (
    id TEXT PRIMARY KEY,
    original TEXT NOT NULL,
    translation TEXT NOT NULL,
    chapter_number INTEGER NOT NULL,
    chapter_name TEXT NOT NULL,
    verse_number INTEGER NOT NULL,
    position INTEGER NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    mastered INTEGER NOT NULL DEFAULT 0,
    saved_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_saved_words_saved_at ON saved_words(saved_at);
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "content_and_annotations",
        sql: MIGRATION_001,
    },
    Migration {
        version: 2,
        name: "saved_words",
        sql: MIGRATION_002,
    },
];
