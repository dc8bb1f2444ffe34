pub mod annotate;
pub mod config;
pub mod import;
pub mod notes;
pub mod prefs;
pub mod progress;
pub mod read;
pub mod search;
pub mod status;
pub mod words;

use anyhow::{Context, Result};
use mushaf_core::model::{Verse, VerseKey};
use mushaf_core::schema::Database;

/// Look up a stored verse, failing with a hint when the text is not loaded.
pub(crate) fn require_verse(db: &Database, key: VerseKey) -> Result<Verse> {
    db.get_verse(key)?
        .with_context(|| format!("Verse {key} is not loaded. Run `mushaf import` first."))
}
