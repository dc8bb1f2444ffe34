use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{MemorizedId, VerseKey};

/// Marker for a verse the user has memorized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorizedVerse {
    pub id: MemorizedId,
    pub key: VerseKey,
    pub original_text: String,
    pub memorized_at: DateTime<Utc>,
}

impl MemorizedVerse {
    #[must_use]
    pub fn new(key: VerseKey, original_text: impl Into<String>) -> Self {
        Self {
            id: MemorizedId::new(),
            key,
            original_text: original_text.into(),
            memorized_at: Utc::now(),
        }
    }
}
