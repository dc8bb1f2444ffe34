use anyhow::{Context, Result};
use mushaf_etl::{config, Config};
use toml_edit::DocumentMut;

const VALID_KEYS: &str =
    "database_path, dataset_path, words_path, preferences_path, logging.level, logging.coloured";

fn optional_path(path: Option<&std::path::Path>) -> String {
    path.map_or_else(|| "<not set>".to_string(), |p| p.display().to_string())
}

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  database_path: {}", config.database_path.display());
    println!("  dataset_path: {}", optional_path(config.dataset_path.as_deref()));
    println!("  words_path: {}", optional_path(config.words_path.as_deref()));
    println!("  preferences_path: {}", config.preferences_path.display());
    println!("  logging.level: {}", config.logging.level);
    println!("  logging.coloured: {}", config.logging.coloured);

    println!("\nPriority: CLI args > ENV vars (MUSHAF_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the whole file.
pub fn get_config(key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        let config_path = config::config_file_path();
        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{contents}");
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'mushaf config init' to create it.");
        }
        return Ok(());
    };

    let config = Config::load()?;
    let value = match key.as_str() {
        "database_path" => config.database_path.display().to_string(),
        "dataset_path" => optional_path(config.dataset_path.as_deref()),
        "words_path" => optional_path(config.words_path.as_deref()),
        "preferences_path" => config.preferences_path.display().to_string(),
        "logging.level" => config.logging.level,
        "logging.coloured" => config.logging.coloured.to_string(),
        _ => anyhow::bail!("Unknown config key: {key}\n\nValid keys: {VALID_KEYS}"),
    };
    println!("{value}");
    Ok(())
}

/// Apply `key = value` to a config document, keeping its comments and layout.
pub(crate) fn set_value(contents: &str, key: &str, value: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Config file is not valid TOML")?;

    match key {
        "database_path" | "dataset_path" | "words_path" | "preferences_path" => {
            doc[key] = toml_edit::value(value);
        }
        "logging.level" | "logging.coloured" => {
            if !doc.contains_key("logging") {
                doc["logging"] = toml_edit::table();
            }
            let field = key.trim_start_matches("logging.");
            doc["logging"][field] = if field == "coloured" {
                let flag: bool = value
                    .parse()
                    .with_context(|| format!("Expected true or false for {key}, got '{value}'"))?;
                toml_edit::value(flag)
            } else {
                toml_edit::value(value)
            };
        }
        _ => anyhow::bail!("Unknown config key: {key}\n\nValid keys: {VALID_KEYS}"),
    }

    Ok(doc.to_string())
}

/// Set a config value.
pub fn set_config(key: &str, value: &str) -> Result<()> {
    let config_path = config::config_file_path();
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = set_value(&contents, key, value)?;
    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {key} = {value}");
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure mushaf.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
