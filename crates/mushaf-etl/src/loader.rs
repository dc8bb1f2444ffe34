//! Dataset loading.
//!
//! Reads the verse dataset in either of its two encodings and produces a
//! flat list of [`RawVerse`] records. Loading is tolerant: a missing file
//! gives an empty list and malformed rows are skipped.

use serde::Deserialize;
use std::path::Path;

use mushaf_core::model::VerseKey;

use crate::error::{EtlError, EtlResult};

/// One verse as it appears in the source dataset, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVerse {
    pub chapter_number: u16,
    pub verse_number: u16,
    pub translation: String,
    pub original_text: String,
    /// Footnote text, empty when the dataset has none.
    pub footnote: String,
}

impl RawVerse {
    #[must_use]
    pub const fn key(&self) -> VerseKey {
        VerseKey::new(self.chapter_number, self.verse_number)
    }
}

/// Encoding of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Json,
}

impl DatasetFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Load a dataset file, choosing the parser from its extension.
///
/// A missing or unreadable file yields an empty list. Only an unsupported
/// extension is an error.
pub fn load_dataset(path: &Path) -> EtlResult<Vec<RawVerse>> {
    let format = DatasetFormat::from_path(path).ok_or_else(|| EtlError::InvalidDataset {
        path: path.display().to_string(),
        message: "unsupported format (use .csv or .json)".to_string(),
    })?;

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("Could not read dataset {}: {}", path.display(), e);
            return Ok(Vec::new());
        }
    };

    let verses = parse(&content, format);
    log::info!("Loaded {} verses from {}", verses.len(), path.display());
    Ok(verses)
}

/// Parse dataset content that is already in memory.
#[must_use]
pub fn parse(content: &str, format: DatasetFormat) -> Vec<RawVerse> {
    match format {
        DatasetFormat::Csv => parse_csv(content),
        DatasetFormat::Json => parse_json(content),
    }
}

/// Column positions taken from the header row.
#[derive(Debug, Clone, Copy)]
struct HeaderLayout {
    width: usize,
    translation: usize,
    footnote: Option<usize>,
    original: Option<usize>,
}

impl HeaderLayout {
    /// Recognize a header row: its first three fields are `id`, `sura`, `aya`.
    fn detect(record: &csv::StringRecord) -> Option<Self> {
        let field = |i: usize| record.get(i).map(str::to_ascii_lowercase);
        let is_header = field(0).as_deref() == Some("id")
            && matches!(field(1).as_deref(), Some("sura" | "surah"))
            && matches!(field(2).as_deref(), Some("aya" | "ayah"));
        if !is_header {
            return None;
        }

        let position = |names: &[&str]| {
            record
                .iter()
                .position(|f| names.iter().any(|n| f.eq_ignore_ascii_case(n)))
        };

        Some(Self {
            width: record.len(),
            translation: position(&["translation"]).unwrap_or(3),
            footnote: position(&["footnotes", "footnote"]),
            original: position(&["arabic", "original"]),
        })
    }
}

/// Parse the tabular encoding.
///
/// Standard quoting rules apply: fields may be wrapped in double quotes,
/// contain commas and line breaks, and escape quotes by doubling them.
/// Rows before the header are ignored.
#[must_use]
pub fn parse_csv(content: &str) -> Vec<RawVerse> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut layout: Option<HeaderLayout> = None;
    let mut verses = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Skipping unreadable row {}: {}", row + 1, e);
                continue;
            }
        };

        let Some(header) = layout else {
            layout = HeaderLayout::detect(&record);
            if layout.is_none() {
                log::debug!("Ignoring row {} before header", row + 1);
            }
            continue;
        };

        if record.len() != header.width {
            log::debug!(
                "Skipping row {}: expected {} fields, found {}",
                row + 1,
                header.width,
                record.len()
            );
            continue;
        }

        match csv_row_to_verse(&record, header) {
            Some(verse) => verses.push(verse),
            None => log::debug!("Skipping row {}: bad id, chapter, or verse number", row + 1),
        }
    }

    if layout.is_none() {
        log::warn!("Dataset has no id,sura,aya header; no verses loaded");
    }

    verses
}

fn csv_row_to_verse(record: &csv::StringRecord, header: HeaderLayout) -> Option<RawVerse> {
    let _id: u32 = record.get(0)?.parse().ok()?;
    let chapter = record.get(1)?.parse::<u16>().ok()?;
    let verse = record.get(2)?.parse::<u16>().ok()?;
    let key = VerseKey::new(chapter, verse).validate().ok()?;
    let text = |idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .unwrap_or_default()
            .to_string()
    };

    Some(RawVerse {
        chapter_number: key.chapter,
        verse_number: key.verse,
        translation: text(Some(header.translation)),
        original_text: text(header.original),
        footnote: text(header.footnote),
    })
}

/// One element of the JSON encoding.
#[derive(Debug, Deserialize)]
struct JsonVerse {
    id: u32,
    #[serde(alias = "sura")]
    surah: u16,
    #[serde(alias = "aya")]
    ayah: u16,
    translation: String,
    #[serde(default, alias = "footnote")]
    footnotes: String,
    #[serde(default)]
    arabic: String,
}

/// Parse the JSON encoding: a list of verse objects.
///
/// Each element is decoded on its own, so one bad element does not discard
/// the rest.
#[must_use]
pub fn parse_json(content: &str) -> Vec<RawVerse> {
    let elements = match serde_json::from_str::<serde_json::Value>(content) {
        Ok(serde_json::Value::Array(elements)) => elements,
        Ok(_) => {
            log::warn!("JSON dataset is not a list; no verses loaded");
            return Vec::new();
        }
        Err(e) => {
            log::warn!("Could not decode JSON dataset: {}", e);
            return Vec::new();
        }
    };

    elements
        .into_iter()
        .enumerate()
        .filter_map(|(idx, element)| {
            let decoded = match serde_json::from_value::<JsonVerse>(element) {
                Ok(decoded) => decoded,
                Err(e) => {
                    log::debug!("Skipping element {}: {}", idx, e);
                    return None;
                }
            };
            match VerseKey::new(decoded.surah, decoded.ayah).validate() {
                Ok(key) => Some(RawVerse {
                    chapter_number: key.chapter,
                    verse_number: key.verse,
                    translation: decoded.translation.trim().to_string(),
                    original_text: decoded.arabic.trim().to_string(),
                    footnote: decoded.footnotes.trim().to_string(),
                }),
                Err(e) => {
                    log::debug!("Skipping element {} (id {}): {}", idx, decoded.id, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DatasetFormat::from_path(Path::new("quran.CSV")),
            Some(DatasetFormat::Csv)
        );
        assert_eq!(
            DatasetFormat::from_path(Path::new("/data/english_rwwad.json")),
            Some(DatasetFormat::Json)
        );
        assert_eq!(DatasetFormat::from_path(Path::new("quran.txt")), None);
        assert_eq!(DatasetFormat::from_path(Path::new("quran")), None);
    }

    #[test]
    fn test_parse_csv_header_and_empty_footnote() {
        let content = "id,sura,aya,translation,footnotes\n1,1,1,\"In the name of Allah\",\"\" \n";
        let verses = parse_csv(content);
        assert_eq!(
            verses,
            vec![RawVerse {
                chapter_number: 1,
                verse_number: 1,
                translation: "In the name of Allah".to_string(),
                original_text: String::new(),
                footnote: String::new(),
            }]
        );
    }

    #[test]
    fn test_parse_csv_quoting() {
        let content = concat!(
            "id,sura,aya,translation,footnotes\n",
            "8,2,1,\"Alif, Lam, Mim.\",\"[1] Letters\nof the alphabet\"\n",
            "9,2,2,\"This is the \"\"Book\"\"\",\n",
        );
        let verses = parse_csv(content);
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[0].translation, "Alif, Lam, Mim.");
        assert_eq!(verses[0].footnote, "[1] Letters\nof the alphabet");
        assert_eq!(verses[1].translation, "This is the \"Book\"");
        assert_eq!(verses[1].footnote, "");
    }

    #[test]
    fn test_parse_csv_row_count_matches_data_rows() {
        use std::fmt::Write;

        let mut content = String::from("id,sura,aya,translation,footnotes\n");
        for verse in 1..=7 {
            writeln!(content, "{verse},1,{verse},\"verse {verse}\",\"\"").unwrap();
        }
        assert_eq!(parse_csv(&content).len(), 7);
    }

    #[test]
    fn test_parse_csv_skips_malformed_rows() {
        let content = concat!(
            "1,1,1,\"before header\",\"\"\n",
            "id,sura,aya,translation,footnotes\n",
            "1,1,1,\"ok\",\"\"\n",
            "2,1,2,\"missing footnote column\"\n",
            "3,x,3,\"bad chapter\",\"\"\n",
            "4,115,1,\"out of range\",\"\"\n",
            "5,1,0,\"verse zero\",\"\"\n",
            "6,1,3,\"extra\",\"\",\"field\"\n",
            "7,1,4,\"also ok\",\"note\"\n",
            "abc,1,5,\"bad id\",\"\"\n",
            ",1,6,\"missing id\",\"\"\n",
        );
        let verses = parse_csv(content);
        let keys: Vec<_> = verses.iter().map(RawVerse::key).collect();
        assert_eq!(keys, vec![VerseKey::new(1, 1), VerseKey::new(1, 4)]);
        assert_eq!(verses[1].footnote, "note");
    }

    #[test]
    fn test_parse_csv_optional_arabic_column() {
        let content = "id,sura,aya,arabic,translation,footnotes\n1,112,1,\"قُلْ هُوَ اللَّهُ أَحَدٌ\",\"Say, He is Allah, the One\",\n";
        let verses = parse_csv(content);
        assert_eq!(verses[0].original_text, "قُلْ هُوَ اللَّهُ أَحَدٌ");
        assert_eq!(verses[0].translation, "Say, He is Allah, the One");
    }

    #[test]
    fn test_parse_csv_without_header() {
        assert!(parse_csv("1,1,1,\"text\",\"\"\n").is_empty());
        assert!(parse_csv("").is_empty());
    }

    #[test]
    fn test_parse_json() {
        let content = r#"[
            {"id": 1, "sura": 1, "aya": 1, "translation": "In the name of Allah", "footnotes": "", "arabic": "بِسْمِ اللَّهِ"},
            {"id": 2, "surah": 1, "ayah": 2, "translation": "All praise", "footnotes": "[1] note", "arabic": "الْحَمْدُ"},
            {"id": 3, "surah": "one", "ayah": 3, "translation": "bad", "footnotes": "", "arabic": ""},
            {"id": 4, "surah": 200, "ayah": 1, "translation": "out of range", "footnotes": "", "arabic": ""}
        ]"#;
        let verses = parse_json(content);
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[0].original_text, "بِسْمِ اللَّهِ");
        assert_eq!(verses[1].key(), VerseKey::new(1, 2));
        assert_eq!(verses[1].footnote, "[1] note");
    }

    #[test]
    fn test_parse_json_requires_numeric_id() {
        let content = r#"[
            {"sura": 1, "aya": 1, "translation": "no id", "footnotes": ""},
            {"id": "first", "sura": 1, "aya": 2, "translation": "text id", "footnotes": ""},
            {"id": 3, "sura": 1, "aya": 3, "translation": "kept", "footnotes": ""}
        ]"#;
        let verses = parse_json(content);
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].key(), VerseKey::new(1, 3));
    }

    #[test]
    fn test_parse_json_not_a_list() {
        assert!(parse_json(r#"{"sura": 1}"#).is_empty());
        assert!(parse_json("not json").is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let verses = load_dataset(&dir.path().join("absent.csv")).unwrap();
        assert!(verses.is_empty());
    }

    #[test]
    fn test_load_unsupported_extension() {
        let result = load_dataset(&PathBuf::from("quran.xml"));
        assert!(matches!(result, Err(EtlError::InvalidDataset { .. })));
    }

    #[test]
    fn test_load_dataset_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quran.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "sura": 114, "aya": 1, "translation": "Say, I seek refuge", "footnotes": "", "arabic": "قُلْ"}]"#,
        )
        .unwrap();
        let verses = load_dataset(&path).unwrap();
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].chapter_number, 114);
    }
}
