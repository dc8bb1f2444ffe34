//! Core domain model for mushaf.
//!
//! This crate defines the chapter/verse/word content model, the fixed
//! chapter reference table, the SQLite schema with its annotation store,
//! reading progress tracking, statistics, and reading preferences.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod preferences;
pub mod progress;
pub mod reference;
pub mod schema;
pub mod stats;

pub use error::{Error, Result};
pub use preferences::{Color, ReadingPreferences};
pub use progress::{progress_percentage, ProgressTracker};
pub use reference::{chapter_meta, total_verse_count, ChapterMeta, CHAPTERS, CHAPTER_COUNT};
pub use schema::Database;
pub use stats::ReadingStats;
