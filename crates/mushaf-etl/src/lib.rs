//! Import and export for mushaf.
//!
//! Loads the verse dataset, normalizes it into chapters, applies optional
//! word alignment, and stores the result through treadle `Stage`
//! implementations. Also exports personal notes as CSV.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod audit;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod words;
pub mod work_item;

pub use audit::AuditStage;
pub use config::Config;
pub use error::{EtlError, EtlResult};
pub use export::{export_notes, write_notes_csv, EXPORT_HEADER};
pub use import::{import_dataset, ImportReport, ImportStage};
pub use loader::{load_dataset, DatasetFormat, RawVerse};
pub use normalize::{incomplete_chapters, normalize};
pub use pipeline::build_pipeline;
pub use words::{apply_word_alignment, AlignedWord, WordAlignment};
pub use work_item::Dataset;
