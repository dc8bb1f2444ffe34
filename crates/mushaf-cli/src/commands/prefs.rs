use anyhow::{Context, Result};
use std::path::Path;

use mushaf_core::ReadingPreferences;

#[derive(Debug, clap::Subcommand)]
pub enum PrefsCommand {
    /// Show the current reading preferences
    Show,
    /// Change one preference
    ///
    /// Keys: text_color, background_color, arabic_font_size,
    /// english_font_size, show_arabic, show_english, dark_mode.
    /// Font sizes are clamped to 12-40.
    Set { key: String, value: String },
    /// Switch between the light and dark theme
    ToggleTheme,
    /// Restore the defaults
    Reset,
}

fn print_prefs(prefs: &ReadingPreferences) {
    println!("text_color        = {}", prefs.text_color.as_str());
    println!("background_color  = {}", prefs.background_color.as_str());
    println!("arabic_font_size  = {}", prefs.arabic_font_size);
    println!("english_font_size = {}", prefs.english_font_size);
    println!("show_arabic       = {}", prefs.show_arabic);
    println!("show_english      = {}", prefs.show_english);
    println!("dark_mode         = {}", prefs.dark_mode);
}

pub fn run(command: PrefsCommand, path: &Path) -> Result<()> {
    let current = ReadingPreferences::load(path)
        .with_context(|| format!("Failed to load preferences from {}", path.display()))?;

    let updated = match command {
        PrefsCommand::Show => {
            print_prefs(&current);
            return Ok(());
        }
        PrefsCommand::Set { key, value } => current.with_setting(&key, &value)?,
        PrefsCommand::ToggleTheme => current.toggle_theme(),
        PrefsCommand::Reset => current.reset(),
    };

    updated
        .save(path)
        .with_context(|| format!("Failed to save preferences to {}", path.display()))?;
    log::debug!("Saved preferences to {}", path.display());
    print_prefs(&updated);
    Ok(())
}
