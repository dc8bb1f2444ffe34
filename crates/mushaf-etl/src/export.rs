//! Notes export as CSV.

use std::io;
use std::path::Path;

use mushaf_core::model::NoteWithCategory;
use mushaf_core::schema::Database;

use crate::error::EtlResult;

/// Header row of the notes export.
pub const EXPORT_HEADER: [&str; 8] = [
    "Chapter",
    "Verse",
    "Original Text",
    "Translation",
    "Note",
    "Category",
    "Created",
    "Updated",
];

/// Write notes as CSV, one row per note in the order given.
///
/// Returns the number of rows written, not counting the header.
pub fn write_notes_csv<W: io::Write>(writer: W, notes: &[NoteWithCategory]) -> EtlResult<usize> {
    let mut csv = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    csv.write_record(EXPORT_HEADER)?;
    for entry in notes {
        let note = &entry.note;
        csv.write_record([
            note.key.chapter.to_string().as_str(),
            note.key.verse.to_string().as_str(),
            note.original_text.as_str(),
            note.translation.as_str(),
            note.text.as_str(),
            entry.category_name(),
            note.created_at.to_rfc3339().as_str(),
            note.updated_at.to_rfc3339().as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(notes.len())
}

/// Export every stored note, oldest first, to a file.
pub fn export_notes(db: &Database, path: &Path) -> EtlResult<usize> {
    let notes = db.list_notes_for_export()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    let written = write_notes_csv(file, &notes)?;
    log::info!("Exported {} notes to {}", written, path.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use mushaf_core::model::{Category, Note, VerseKey};

    fn export_to_string(notes: &[NoteWithCategory]) -> String {
        let mut buffer = Vec::new();
        write_notes_csv(&mut buffer, notes).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_only_when_empty() {
        let output = export_to_string(&[]);
        assert_eq!(
            output,
            "Chapter,Verse,Original Text,Translation,Note,Category,Created,Updated\n"
        );
    }

    #[test]
    fn test_uncategorized_and_quoting() {
        let category = Category::new("Duas", "#2ECC71").unwrap();
        let with_category = NoteWithCategory {
            note: Note::new(VerseKey::new(2, 201), "رَبَّنَا آتِنَا", "Our Lord, give us", "say it, often")
                .with_category(category.id),
            category: Some(category),
        };
        let without_category = NoteWithCategory {
            note: Note::new(VerseKey::new(1, 1), "بِسْمِ", "In the \"name\"", "plain"),
            category: None,
        };

        let output = export_to_string(&[with_category, without_category]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2,201,"));
        assert!(lines[1].contains("\"say it, often\",Duas,"));
        assert!(lines[2].contains("\"In the \"\"name\"\"\""));

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows[1].get(5), Some("Uncategorized"));
        assert_eq!(rows[1].get(3), Some("In the \"name\""));
    }

    #[test]
    fn test_export_notes_oldest_first() {
        let db = Database::open_in_memory().unwrap();
        let mut older = Note::new(VerseKey::new(3, 1), "o", "t", "older");
        older.created_at = Utc::now() - Duration::days(2);
        older.updated_at = older.created_at;
        db.insert_note(&Note::new(VerseKey::new(4, 1), "o", "t", "newer"))
            .unwrap();
        db.insert_note(&older).unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("exports").join("notes.csv");
        assert_eq!(export_notes(&db, &path).unwrap(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[1].contains("older"));
        assert!(lines[2].contains("newer"));
    }
}
