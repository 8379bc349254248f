//! Configuration for the `standup` binary.
//!
//! Reads the `[store]` and `[log]` sections from `config/default.toml`.
//! Every key falls back to its default when the file, the section, or the
//! key is missing or malformed.

use std::path::{Path, PathBuf};

use standup_store::DEFAULT_DATABASE_NAME;

/// Default location of the configuration file, relative to the working directory.
pub const CONFIG_PATH: &str = "config/default.toml";

/// Environment variable overriding the database path.
pub const DB_ENV_VAR: &str = "STANDUP_DB";

/// Settings loaded from `config/default.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the meeting database lives.
    pub db_path: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: Path::new("data").join(DEFAULT_DATABASE_NAME),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Pick the database path: flag, then environment, then config file.
    pub fn resolve_db_path(&self, flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
        flag.or_else(|| env.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| self.db_path.clone())
    }
}

/// Load configuration from `path`.
pub fn load_config(path: impl AsRef<Path>) -> Config {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(_) => Config::default(),
    }
}

fn parse_config(content: &str) -> Config {
    let defaults = Config::default();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return defaults,
    };

    let db_path = match table.get("store") {
        Some(toml::Value::Table(store)) => store
            .get("path")
            .and_then(|v| v.as_str())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path),
        _ => defaults.db_path,
    };

    let log_level = match table.get("log") {
        Some(toml::Value::Table(log)) => log
            .get("level")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or(defaults.log_level),
        _ => defaults.log_level,
    };

    Config { db_path, log_level }
}
