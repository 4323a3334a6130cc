//! # CLI Configuration
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KOST_*`)
//! 2. Config file (`config.toml`, or the path given with `--config`)
//! 3. Defaults (this file)
//!
//! ## Example Config File
//! ```toml
//! db_path = "/var/lib/kost/kost.db"
//! db_max_connections = 5
//! db_timeout_secs = 30
//! currency_symbol = "Rp"
//! recent_limit = 10
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use kost_core::{Money, DEFAULT_RECENT_LIMIT};
use kost_db::DbConfig;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,

    /// SQLite connection pool size
    pub db_max_connections: u32,

    /// Seconds to wait for a connection or for the write lock
    pub db_timeout_secs: u64,

    /// Symbol printed before formatted amounts
    pub currency_symbol: String,

    /// Rows in the recent orders and bookings lists of the owner summary
    pub recent_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: None,
            db_max_connections: 5,
            db_timeout_secs: 30,
            currency_symbol: "Rp".to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();

        let path = config_path.map(Path::to_path_buf).or_else(default_config_path);
        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_max_connections == 0 {
            return Err(ConfigError::Invalid(
                "db_max_connections must be greater than 0".into(),
            ));
        }
        if self.db_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "db_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.recent_limit == 0 {
            return Err(ConfigError::Invalid(
                "recent_limit must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Applies `KOST_*` overrides read through `lookup`.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("KOST_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.db_path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = lookup("KOST_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        override_number(&lookup, "KOST_DB_MAX_CONNECTIONS", &mut self.db_max_connections);
        override_number(&lookup, "KOST_DB_TIMEOUT_SECS", &mut self.db_timeout_secs);
        override_number(&lookup, "KOST_RECENT_LIMIT", &mut self.recent_limit);
    }

    /// Pool settings for the resolved database file.
    pub fn db_config(&self) -> Result<DbConfig, ConfigError> {
        Ok(DbConfig::new(self.database_path()?)
            .max_connections(self.db_max_connections)
            .timeout(Duration::from_secs(self.db_timeout_secs)))
    }

    /// Resolves the database file, creating the data directory if needed.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs()
            .ok_or_else(|| ConfigError::Invalid("Could not determine app data directory".into()))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("kost.db"))
    }

    /// Formats a rupiah amount with dot thousands separators.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(2_400_000), "Rp 2.400.000");
    /// ```
    pub fn format_currency(&self, rupiah: i64) -> String {
        Money::from_rupiah(rupiah).format_with_symbol(&self.currency_symbol)
    }
}

fn override_number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    if let Some(value) = lookup(key) {
        match value.trim().parse() {
            Ok(n) => *target = n,
            Err(_) => warn!(key, value = %value, "Ignoring non-numeric override"),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("id", "kost", "kost")
}

fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_currency() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(2_400_000), "Rp 2.400.000");
        assert_eq!(config.format_currency(800), "Rp 800");
        assert_eq!(config.format_currency(0), "Rp 0");
        assert_eq!(config.format_currency(-15_000), "-Rp 15.000");

        let idr = AppConfig {
            currency_symbol: "IDR".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(idr.format_currency(1_000), "IDR 1.000");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: AppConfig = toml::from_str(
            r#"
            db_path = "/tmp/from-file.db"
            recent_limit = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.currency_symbol, "Rp");

        let env: HashMap<&str, &str> = [
            ("KOST_DB_PATH", "/tmp/from-env.db"),
            ("KOST_DB_MAX_CONNECTIONS", "12"),
            ("KOST_RECENT_LIMIT", "not-a-number"),
        ]
        .into_iter()
        .collect();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/from-env.db")));
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.db_timeout_secs, 30);
        assert_eq!(config.recent_limit, 5);
    }

    #[test]
    fn test_db_config_carries_pool_settings() {
        let config = AppConfig {
            db_path: Some(PathBuf::from("/tmp/kost-pool.db")),
            db_max_connections: 3,
            db_timeout_secs: 7,
            ..AppConfig::default()
        };

        let db = config.db_config().unwrap();

        assert_eq!(db.database_path, PathBuf::from("/tmp/kost-pool.db"));
        assert_eq!(db.max_connections, 3);
        assert_eq!(db.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_load_explicit_file() {
        let path = std::env::temp_dir().join(format!("kost-config-{}.toml", std::process::id()));
        std::fs::write(&path, "currency_symbol = \"IDR\"\nrecent_limit = 3\n").unwrap();

        let config = AppConfig::load(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.recent_limit, 3);
    }

    #[test]
    fn test_zero_limits_rejected() {
        for config in [
            AppConfig {
                recent_limit: 0,
                ..AppConfig::default()
            },
            AppConfig {
                db_max_connections: 0,
                ..AppConfig::default()
            },
            AppConfig {
                db_timeout_secs: 0,
                ..AppConfig::default()
            },
        ] {
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        }
    }
}
