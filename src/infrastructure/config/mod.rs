use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "leadimport.toml";
const ENV_PREFIX: &str = "LEADIMPORT_";

/// Application configuration. Layered: defaults, TOML file, `LEADIMPORT_*` env vars.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub database: DatabaseConfig,

    #[validate(nested)]
    pub import: ImportConfig,

    #[validate(nested)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite://leads.db`
    #[validate(length(min = 1))]
    pub url: String,

    /// Pool size. In-memory databases always use a single connection.
    #[validate(range(min = 1, max = 32))]
    pub max_connections: u32,

    /// How long a writer waits on a locked database before giving up
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://leads.db".to_string(),
            max_connections: 4,
            busy_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportConfig {
    /// Uploads above this size are refused before decoding
    #[validate(range(min = 1))]
    pub max_file_bytes: usize,

    /// Number of inserts in flight at once
    #[validate(range(min = 1, max = 64))]
    pub insert_concurrency: usize,

    /// Fixed CSV delimiter. Detected from the content when unset.
    pub csv_delimiter: Option<char>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 10 * 1024 * 1024,
            insert_concurrency: 4,
            csv_delimiter: None,
        }
    }
}

impl ImportConfig {
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self.csv_delimiter {
            None => Ok(None),
            Some(c) if c.is_ascii() && !c.is_ascii_alphanumeric() && c != '"' => Ok(Some(c as u8)),
            Some(c) => Err(AppError::ConfigError(format!(
                "import.csv_delimiter must be an ASCII punctuation or whitespace character, got {:?}",
                c
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence
    #[validate(length(min = 1))]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (or `leadimport.toml` when it exists) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // A missing .env file is the normal case
        let _ = dotenvy::dotenv();

        let file = match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(AppError::ConfigError(format!(
                        "Config file not found: {}",
                        explicit.display()
                    )));
                }
                explicit.to_path_buf()
            }
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load configuration: {}", e)))?;

        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid configuration: {}", e)))?;
        config.import.delimiter_byte()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_toml(toml: &str) -> Result<AppConfig> {
        AppConfig::from_figment(
            Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(toml)),
        )
    }

    #[test]
    fn test_defaults() {
        let config = with_toml("").unwrap();
        assert_eq!(config.database.url, "sqlite://leads.db");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.import.insert_concurrency, 4);
        assert_eq!(config.import.max_file_bytes, 10 * 1024 * 1024);
        assert_eq!(config.import.csv_delimiter, None);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = with_toml(
            r#"
            [database]
            url = "sqlite::memory:"

            [import]
            insert_concurrency = 8
            csv_delimiter = ";"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.busy_timeout_secs, 5);
        assert_eq!(config.import.insert_concurrency, 8);
        assert_eq!(config.import.delimiter_byte().unwrap(), Some(b';'));
    }

    #[test]
    fn test_out_of_range_concurrency_is_rejected() {
        let result = with_toml("[import]\ninsert_concurrency = 0");
        assert!(matches!(result, Err(AppError::ConfigError(_))));

        let result = with_toml("[import]\ninsert_concurrency = 500");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_bad_delimiter_is_rejected() {
        let result = with_toml("[import]\ncsv_delimiter = \"x\"");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_rejected() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/leadimport.toml")));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
