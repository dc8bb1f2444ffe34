use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for mushaf.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (MUSHAF_* prefix)
/// 3. Config file (~/.config/mushaf/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: MUSHAF_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/mushaf/mushaf.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Verse dataset used by `mushaf import` when no file is given.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,

    /// Optional word-by-word alignment applied during import.
    #[serde(default)]
    pub words_path: Option<PathBuf>,

    /// Where reading preferences are stored.
    #[serde(default = "default_preferences_path")]
    pub preferences_path: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_coloured")]
    pub coloured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            coloured: default_coloured(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            dataset_path: None,
            words_path: None,
            preferences_path: default_preferences_path(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/mushaf/config.toml
    /// Reads environment variables with MUSHAF_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("mushaf");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with custom database path.
    ///
    /// This is used when the --db CLI flag is provided.
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }

    /// Path of the pipeline state database.
    #[must_use]
    pub fn state_db_path(&self) -> PathBuf {
        crate::pipeline::state_db_path(&self.database_path)
    }
}

/// Get the default database path.
///
/// Returns: ~/.local/share/mushaf/mushaf.db (or platform equivalent)
pub fn default_db_path() -> PathBuf {
    data_dir().join("mushaf.db")
}

fn default_preferences_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mushaf")
        .join("preferences.toml")
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_coloured() -> bool {
    true
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mushaf")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/mushaf/config.toml
/// - macOS: ~/Library/Application Support/mushaf/config.toml
/// - Windows: %APPDATA%\mushaf\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mushaf")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Mushaf Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (MUSHAF_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite database
#
# Stores chapters and verses along with favorites, notes, memorization,
# saved words, and reading progress. Re-importing a dataset replaces the
# verses but keeps everything you have added.
#
# Can also be set via:
# - CLI: mushaf --db /custom/path.db status
# - Environment: MUSHAF_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/mushaf.db"

# Verse dataset imported by `mushaf import` when no file is given.
# CSV (id,sura,aya,translation,footnotes) or JSON list of verse objects.
#dataset_path = "/path/to/english_rwwad.csv"

# Optional word-by-word alignment (JSON list of
# {sura, aya, position, arabic, translation}).
#words_path = "/path/to/words.json"

# Reading preferences file (font sizes, colors, theme)
#preferences_path = "/path/to/preferences.toml"

[logging]
# One of: error, warn, info, debug, trace
level = "info"
coloured = true
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
