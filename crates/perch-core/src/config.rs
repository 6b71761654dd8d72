//! Configuration management for perch.
//!
//! Loads configuration from ${PERCH_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// This ensures new comments/sections from the template are always present,
/// while preserving user's customized values.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;

    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for perch configuration and data directories.
    //!
    //! PERCH_HOME resolution order:
    //! 1. PERCH_HOME environment variable (if set)
    //! 2. ~/.config/perch (default)

    use std::path::PathBuf;

    /// Returns the perch home directory.
    ///
    /// Checks PERCH_HOME env var first, falls back to ~/.config/perch
    pub fn perch_home() -> PathBuf {
        if let Ok(home) = std::env::var("PERCH_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("perch"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        perch_home().join("config.toml")
    }

    /// Returns the path to the session credential file.
    pub fn session_path() -> PathBuf {
        perch_home().join("session.json")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL.
    pub base_url: String,

    /// Accept self-signed TLS certificates (local backend deployments).
    pub accept_invalid_certs: bool,

    /// Message shown when a session is torn down after a 401.
    pub landing_hint: String,
}

impl Config {
    /// The original deployment serves the API from localhost over a
    /// self-signed certificate.
    const DEFAULT_BASE_URL: &str = "https://localhost:8000";
    const DEFAULT_LANDING_HINT: &str = "Session expired. Run `perch login` to sign in again.";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template to the default path.
    ///
    /// Fails if a config file already exists.
    pub fn init() -> Result<()> {
        Self::init_to(&paths::config_path())
    }

    /// Writes the default config template to a specific path.
    ///
    /// Fails if a config file already exists.
    pub fn init_to(path: &Path) -> Result<()> {
        anyhow::ensure!(
            !path.exists(),
            "Config already exists at {}",
            path.display()
        );
        Self::write_config(path, default_config_template())
    }

    /// Saves only the base_url field to the config file.
    ///
    /// Creates the file if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_base_url(url: &str) -> Result<()> {
        Self::save_base_url_to(&paths::config_path(), url)
    }

    /// Saves only the base_url field to a specific config file path.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// If file exists, merges user values into the latest template.
    pub fn save_base_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["base_url"] = value(url);

        Self::write_config(path, &doc.to_string())
    }

    fn write_config(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            accept_invalid_certs: false,
            landing_hint: Self::DEFAULT_LANDING_HINT.to_string(),
        }
    }
}
