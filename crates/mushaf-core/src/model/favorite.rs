use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{FavoriteId, VerseKey};

/// A verse the user starred.
///
/// Carries its own copy of the verse text so it stays displayable after
/// the content tables are cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteVerse {
    pub id: FavoriteId,
    pub key: VerseKey,
    pub original_text: String,
    pub translation: String,
    pub added_at: DateTime<Utc>,
}

impl FavoriteVerse {
    #[must_use]
    pub fn new(
        key: VerseKey,
        original_text: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            id: FavoriteId::new(),
            key,
            original_text: original_text.into(),
            translation: translation.into(),
            added_at: Utc::now(),
        }
    }
}
