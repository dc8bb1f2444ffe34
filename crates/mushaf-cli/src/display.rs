//! Terminal output helpers shared by the commands.

use mushaf_core::model::{Chapter, Verse};
use mushaf_core::ReadingPreferences;

/// Shorten text to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let cut: String = single_line.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

/// Text progress bar, e.g. `[#####-----]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).floor() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn chapter_heading(chapter: &Chapter) -> String {
    format!(
        "{}. {} ({}) · {} · {} verses",
        chapter.number, chapter.name, chapter.original_name, chapter.origin, chapter.verse_count
    )
}

/// Print a verse honoring the reader's show/hide preferences.
pub fn print_verse(verse: &Verse, prefs: &ReadingPreferences, with_words: bool) {
    println!("  [{}]", verse.key);
    if prefs.show_arabic && !verse.original_text.is_empty() {
        println!("    {}", verse.original_text);
    }
    if prefs.show_english {
        println!("    {}", verse.translation);
    }
    if let Some(footnote) = &verse.footnote {
        println!("    ↳ {}", footnote.replace('\n', "\n      "));
    }
    if with_words && verse.has_word_alignment() {
        for word in &verse.words {
            println!("      {:>3}  {}  {}", word.position, word.original, word.translation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("line one\nline two", 40), "line one line two");
        assert_eq!(truncate("In the name of Allah", 8), "In the…");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[----]");
        assert_eq!(progress_bar(50.0, 4), "[##--]");
        assert_eq!(progress_bar(250.0, 4), "[####]");
    }
}
