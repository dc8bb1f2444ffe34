use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use mushaf_core::model::VerseKey;
use mushaf_core::schema::Database;
use mushaf_core::ReadingPreferences;
use mushaf_etl::config::{self, LoggingConfig};
use mushaf_etl::Config;

mod commands;
mod display;

#[derive(Debug, Parser)]
#[command(name = "mushaf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/mushaf/mushaf.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Import a verse dataset
    ///
    /// Loads a CSV or JSON dataset, groups the verses into the 114
    /// chapters, and replaces the stored text. Favorites, notes,
    /// memorization, saved words, and reading progress are kept.
    ///
    /// CSV files need a header row starting with id,sura,aya followed by
    /// translation and footnotes columns (an arabic column is optional).
    /// JSON files hold a list of {id, sura, aya, translation, footnotes,
    /// arabic} objects. Malformed rows are skipped.
    ///
    /// An optional word-by-word alignment file replaces the single
    /// whole-verse word with a real breakdown.
    Import {
        /// Dataset file (default: dataset_path from the config)
        path: Option<PathBuf>,

        /// Word alignment JSON (default: words_path from the config)
        #[arg(long)]
        words: Option<PathBuf>,
    },
    /// List chapters with their reading progress
    Chapters {
        /// Only chapters whose names, origin, or verses match
        filter: Option<String>,
    },
    /// Read a chapter and record the verses as viewed
    Read {
        /// Chapter number (1-114)
        chapter: u16,

        /// Show a single verse
        #[arg(long)]
        verse: Option<u16>,

        /// Show the word-by-word breakdown
        #[arg(long)]
        words: bool,

        /// Do not record the verses as viewed
        #[arg(long)]
        no_track: bool,
    },
    /// Search verse text, translations, and words
    Search {
        query: String,

        /// Maximum number of verses to show
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Reading progress
    #[command(subcommand)]
    Progress(commands::progress::ProgressCommand),
    /// Favorite verses
    #[command(subcommand)]
    Favorite(commands::annotate::FavoriteCommand),
    /// Memorized verses
    #[command(subcommand)]
    Memorize(commands::annotate::MemorizeCommand),
    /// Personal notes on verses
    #[command(subcommand)]
    Note(commands::notes::NoteCommand),
    /// Note categories
    #[command(subcommand)]
    Category(commands::notes::CategoryCommand),
    /// Saved vocabulary words
    #[command(subcommand)]
    Word(commands::words::WordCommand),
    /// Reading preferences
    #[command(subcommand)]
    Prefs(commands::prefs::PrefsCommand),
    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Show library status
    Status,
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file
    Get { key: Option<String> },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

/// Parse `chapter:verse` for clap arguments.
pub fn parse_verse_key(s: &str) -> std::result::Result<VerseKey, String> {
    s.parse::<VerseKey>().map_err(|e| e.to_string())
}

fn log_level(level: &str) -> twyg::LogLevel {
    match level.to_ascii_lowercase().as_str() {
        "trace" => twyg::LogLevel::Trace,
        "debug" => twyg::LogLevel::Debug,
        "warn" | "warning" => twyg::LogLevel::Warn,
        "error" => twyg::LogLevel::Error,
        _ => twyg::LogLevel::Info,
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let opts = twyg::OptsBuilder::new()
        .coloured(logging.coloured)
        .level(log_level(&logging.level))
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid logging options: {e:?}"))?;
    twyg::setup(opts).map_err(|e| anyhow::anyhow!("Could not set up logger: {e:?}"))?;
    Ok(())
}

fn open_at(path: &Path) -> Result<Database> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Database::open(path).with_context(|| format!("Failed to open database at {}", path.display()))
}

/// Open the configured database, falling back to the default location.
///
/// Failing at both is the one unrecoverable startup error.
fn open_database(configured: &Path) -> Result<(Database, PathBuf)> {
    match open_at(configured) {
        Ok(db) => Ok((db, configured.to_path_buf())),
        Err(primary) => {
            let fallback = config::default_db_path();
            if fallback == configured {
                return Err(primary);
            }
            log::warn!("{primary:#}; falling back to {}", fallback.display());
            let db = open_at(&fallback).with_context(|| {
                format!(
                    "No usable database: {} and {} both failed",
                    configured.display(),
                    fallback.display()
                )
            })?;
            Ok((db, fallback))
        }
    }
}

fn run_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => commands::config::show_config(),
        ConfigCommand::Get { key } => commands::config::get_config(key),
        ConfigCommand::Set { key, value } => commands::config::set_config(&key, &value),
        ConfigCommand::Path => commands::config::show_path(),
        ConfigCommand::Example => commands::config::show_example(),
        ConfigCommand::Init => commands::config::init_config(),
    }
}

async fn run_with_database(command: Commands, config: &Config) -> Result<()> {
    let (db, db_path) = open_database(&config.database_path)?;

    match command {
        Commands::Import { path, words } => {
            let dataset = path
                .or_else(|| config.dataset_path.clone())
                .context("No dataset given and dataset_path is not configured")?;
            let words = words.or_else(|| config.words_path.clone());
            drop(db);
            commands::import::run_import(dataset, words, db_path).await?;
        }
        Commands::Chapters { filter } => {
            commands::read::list_chapters(&db, filter.as_deref())?;
        }
        Commands::Read {
            chapter,
            verse,
            words,
            no_track,
        } => {
            let prefs = ReadingPreferences::load(&config.preferences_path)?;
            let options = commands::read::ReadOptions {
                verse,
                words,
                track: !no_track,
            };
            commands::read::read_chapter(&db, chapter, &prefs, &options)?;
        }
        Commands::Search { query, limit } => {
            commands::search::run_search(&db, &query, limit)?;
        }
        Commands::Progress(command) => commands::progress::run(&db, command)?,
        Commands::Favorite(command) => commands::annotate::run_favorite(&db, command)?,
        Commands::Memorize(command) => commands::annotate::run_memorize(&db, command)?,
        Commands::Note(command) => commands::notes::run_note(&db, command)?,
        Commands::Category(command) => commands::notes::run_category(&db, command)?,
        Commands::Word(command) => commands::words::run(&db, command)?,
        Commands::Status => commands::status::show_status(&db, &db_path)?,
        Commands::Config(command) => run_config(command)?,
        Commands::Prefs(command) => commands::prefs::run(command, &config.preferences_path)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.db {
        Some(db_path) => Config::load_with_db_path(db_path)?,
        None => Config::load()?,
    };

    init_logging(&config.logging)?;

    // Configuration and preferences work without a database.
    match cli.command {
        Commands::Config(command) => run_config(command),
        Commands::Prefs(command) => commands::prefs::run(command, &config.preferences_path),
        command => run_with_database(command, &config).await,
    }
}
