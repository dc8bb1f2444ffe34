//! Reading preferences.
//!
//! `ReadingPreferences` is a plain value: every update returns a new value
//! and the caller decides when to persist it. Nothing here is shared or
//! mutated in place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Smallest font size accepted for either script.
pub const MIN_FONT_SIZE: f64 = 12.0;
/// Largest font size accepted for either script.
pub const MAX_FONT_SIZE: f64 = 40.0;

/// A display color in `#RRGGBB` or `#AARRGGBB` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green, blue, alpha components.
    #[must_use]
    pub fn rgba(&self) -> (u8, u8, u8, u8) {
        let digits = self.0.trim_start_matches('#');
        let byte = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .unwrap_or(0)
        };
        if digits.len() == 8 {
            (byte(2), byte(4), byte(6), byte(0))
        } else {
            (byte(0), byte(2), byte(4), 255)
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        let valid_len = digits.len() == 6 || digits.len() == 8;
        if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidData(format!(
                "invalid color '{s}' (expected #RRGGBB or #AARRGGBB)"
            )));
        }
        Ok(Self(format!("#{}", digits.to_ascii_uppercase())))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const DARK_TEXT: &str = "#F2F2F7";
const DARK_BACKGROUND: &str = "#000000";
const LIGHT_TEXT: &str = "#000000";
const LIGHT_BACKGROUND: &str = "#FFFFFF";

fn color(hex: &str) -> Color {
    Color(hex.to_string())
}

/// How verses are displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingPreferences {
    pub text_color: Color,
    pub background_color: Color,
    pub arabic_font_size: f64,
    pub english_font_size: f64,
    pub show_arabic: bool,
    pub show_english: bool,
    pub dark_mode: bool,
}

impl Default for ReadingPreferences {
    fn default() -> Self {
        Self {
            text_color: color(DARK_TEXT),
            background_color: color(DARK_BACKGROUND),
            arabic_font_size: 28.0,
            english_font_size: 17.0,
            show_arabic: true,
            show_english: true,
            dark_mode: true,
        }
    }
}

impl ReadingPreferences {
    /// Load preferences from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No preferences at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let prefs: Self = toml::from_str(&content).map_err(|e| {
            Error::InvalidData(format!(
                "failed to parse preferences from {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(prefs.normalized())
    }

    /// Write preferences as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidData(format!("failed to serialize preferences: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    #[must_use]
    pub fn with_text_color(self, text_color: Color) -> Self {
        Self { text_color, ..self }
    }

    #[must_use]
    pub fn with_background_color(self, background_color: Color) -> Self {
        Self {
            background_color,
            ..self
        }
    }

    #[must_use]
    pub fn with_arabic_font_size(self, size: f64) -> Self {
        Self {
            arabic_font_size: clamp_font(size),
            ..self
        }
    }

    #[must_use]
    pub fn with_english_font_size(self, size: f64) -> Self {
        Self {
            english_font_size: clamp_font(size),
            ..self
        }
    }

    #[must_use]
    pub fn with_show_arabic(self, show_arabic: bool) -> Self {
        Self {
            show_arabic,
            ..self
        }
    }

    #[must_use]
    pub fn with_show_english(self, show_english: bool) -> Self {
        Self {
            show_english,
            ..self
        }
    }

    /// Switch between dark and light themes, resetting both theme colors.
    #[must_use]
    pub fn toggle_theme(self) -> Self {
        let dark_mode = !self.dark_mode;
        self.with_theme(dark_mode)
    }

    #[must_use]
    pub fn with_theme(self, dark_mode: bool) -> Self {
        let (text, background) = if dark_mode {
            (DARK_TEXT, DARK_BACKGROUND)
        } else {
            (LIGHT_TEXT, LIGHT_BACKGROUND)
        };
        Self {
            dark_mode,
            text_color: color(text),
            background_color: color(background),
            ..self
        }
    }

    /// Defaults, discarding every customization.
    #[must_use]
    pub fn reset(self) -> Self {
        Self::default()
    }

    /// Apply a `key = value` update as given on the command line.
    pub fn with_setting(self, key: &str, value: &str) -> Result<Self> {
        let parse_bool = |v: &str| {
            v.parse::<bool>()
                .map_err(|_| Error::InvalidData(format!("expected true or false for {key}, got '{v}'")))
        };
        let parse_size = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| Error::InvalidData(format!("expected a number for {key}, got '{v}'")))
        };
        Ok(match key {
            "text_color" => self.with_text_color(value.parse()?),
            "background_color" => self.with_background_color(value.parse()?),
            "arabic_font_size" => self.with_arabic_font_size(parse_size(value)?),
            "english_font_size" => self.with_english_font_size(parse_size(value)?),
            "show_arabic" => self.with_show_arabic(parse_bool(value)?),
            "show_english" => self.with_show_english(parse_bool(value)?),
            "dark_mode" => self.with_theme(parse_bool(value)?),
            _ => {
                return Err(Error::InvalidData(format!(
                    "unknown preference '{key}'"
                )))
            }
        })
    }

    fn normalized(self) -> Self {
        Self {
            arabic_font_size: clamp_font(self.arabic_font_size),
            english_font_size: clamp_font(self.english_font_size),
            ..self
        }
    }
}

fn clamp_font(size: f64) -> f64 {
    if size.is_nan() {
        MIN_FONT_SIZE
    } else {
        size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_color_parse() {
        let c: Color = "#3498db".parse().unwrap();
        assert_eq!(c.as_str(), "#3498DB");
        assert_eq!(c.rgba(), (0x34, 0x98, 0xDB, 255));

        let argb: Color = "80FF0000".parse().unwrap();
        assert_eq!(argb.rgba(), (255, 0, 0, 0x80));

        assert!("#12345".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
    }

    #[test]
    fn test_updates_return_new_value() {
        let original = ReadingPreferences::default();
        let larger = original.clone().with_arabic_font_size(32.0);
        assert_eq!(original.arabic_font_size, 28.0);
        assert_eq!(larger.arabic_font_size, 32.0);
    }

    #[test]
    fn test_font_size_is_clamped() {
        let prefs = ReadingPreferences::default()
            .with_english_font_size(4.0)
            .with_arabic_font_size(90.0);
        assert_eq!(prefs.english_font_size, MIN_FONT_SIZE);
        assert_eq!(prefs.arabic_font_size, MAX_FONT_SIZE);
    }

    #[test]
    fn test_toggle_theme() {
        let light = ReadingPreferences::default().toggle_theme();
        assert!(!light.dark_mode);
        assert_eq!(light.background_color.as_str(), LIGHT_BACKGROUND);
        let dark = light.toggle_theme();
        assert_eq!(dark, ReadingPreferences::default());
    }

    #[test]
    fn test_with_setting() {
        let prefs = ReadingPreferences::default()
            .with_setting("show_english", "false")
            .unwrap()
            .with_setting("text_color", "#99CCFF")
            .unwrap();
        assert!(!prefs.show_english);
        assert_eq!(prefs.text_color.as_str(), "#99CCFF");

        assert!(ReadingPreferences::default()
            .with_setting("font", "12")
            .is_err());
        assert!(ReadingPreferences::default()
            .with_setting("show_arabic", "maybe")
            .is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");

        let prefs = ReadingPreferences::default()
            .with_show_arabic(false)
            .with_english_font_size(20.0);
        prefs.save(&path).unwrap();

        let loaded = ReadingPreferences::load(&path).unwrap();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = ReadingPreferences::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(loaded, ReadingPreferences::default());
    }

    #[test]
    fn test_load_rejects_bad_color() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "text_color = \"blue\"\n").unwrap();
        assert!(matches!(
            ReadingPreferences::load(&path),
            Err(Error::InvalidData(_))
        ));
    }
}
