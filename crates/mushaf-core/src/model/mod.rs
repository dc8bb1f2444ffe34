pub mod chapter;
pub mod favorite;
pub mod ids;
pub mod memorized;
pub mod note;
pub mod progress;
pub mod saved_word;
pub mod verse;

pub use chapter::{Chapter, Origin};
pub use favorite::FavoriteVerse;
pub use ids::{CategoryId, FavoriteId, MemorizedId, NoteId, SavedWordId, VerseKey};
pub use memorized::MemorizedVerse;
pub use note::{Category, Note, NoteWithCategory, CATEGORY_PALETTE};
pub use progress::{ReadingProgress, VerseView};
pub use saved_word::SavedWord;
pub use verse::{Verse, Word};
