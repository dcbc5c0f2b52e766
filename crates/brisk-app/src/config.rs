//! TOML configuration.
//!
//! Every section is optional; missing keys take the defaults below.
//!
//! ```toml
//! [app]
//! name = "brisk"
//! env = "production"
//!
//! [database]
//! url = "sqlite::memory:"
//! max_connections = 5
//!
//! [log]
//! level = "info"
//! with_target = false
//! ansi = true
//!
//! [cache]
//! capacity = 1024
//! ttl_secs = 300
//! ```
//!
//! `APP_ENV` and `DATABASE_URL` take precedence over the file.

use std::path::Path;
use std::time::Duration;

use brisk_response::Environment;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable overriding `app.env`.
pub const ENV_VAR_APP_ENV: &str = "APP_ENV";
/// Environment variable overriding `database.url`.
pub const ENV_VAR_DATABASE_URL: &str = "DATABASE_URL";
/// Upper bound accepted for `cache.ttl_secs` (one year).
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub name: String,
    /// One of `production`, `development`, `local`, `testing`.
    /// Anything else is treated as production.
    pub env: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "brisk".to_string(),
            env: Environment::Production.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`.
    pub level: String,
    pub with_target: bool,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
            ansi: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub capacity: usize,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            ttl_secs: 300,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Config {
    /// Loads the configuration from `path`, or the defaults when `path` is
    /// `None`, then applies environment overrides and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| AppError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document. No overrides or validation are applied.
    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies `APP_ENV` and `DATABASE_URL` as returned by `lookup`.
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(env) = non_empty(ENV_VAR_APP_ENV) {
            self.app.env = env;
        }
        if let Some(url) = non_empty(ENV_VAR_DATABASE_URL) {
            self.database.url = url;
        }
    }

    /// Rejects values the context cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(AppError::InvalidConfig("database.url is empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::InvalidConfig(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.cache.ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(AppError::InvalidConfig(format!(
                "cache.ttl_secs must be at most {MAX_CACHE_TTL_SECS}"
            )));
        }
        if self.log.level.parse::<tracing::Level>().is_err() {
            return Err(AppError::InvalidConfig(format!(
                "log.level '{}' is not a valid level",
                self.log.level
            )));
        }
        Ok(())
    }

    /// The deployment environment named by `app.env`.
    pub fn environment(&self) -> Environment {
        Environment::detect(&self.app.env)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.app.name, "brisk");
        assert_eq!(config.environment(), Environment::Production);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [app]
            env = "development"

            [database]
            url = "sqlite://data.db"

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.app.name, "brisk");
        assert_eq!(config.environment(), Environment::Development);
        assert_eq!(config.database.url, "sqlite://data.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.log.level, "debug");
        assert!(config.log.ansi);
        assert_eq!(config.cache.capacity, 1024);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Config::from_toml("[database]\nurll = \"x\"\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_VAR_APP_ENV, "testing"),
            (ENV_VAR_DATABASE_URL, "sqlite://override.db"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::from_toml("[database]\nurl = \"sqlite://file.db\"\n").unwrap();
        config.apply_overrides(|key| vars.get(key).map(ToString::to_string));

        assert_eq!(config.environment(), Environment::Testing);
        assert_eq!(config.database.url, "sqlite://override.db");
    }

    #[test]
    fn test_empty_env_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|_| Some(String::from("  ")));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));

        let mut config = Config::default();
        config.log.level = "loud".to_string();
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_bounds_cache_ttl() {
        let config = Config::from_toml("[cache]\nttl_secs = 9223372036854775807\n").unwrap();
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));

        let mut config = Config::default();
        config.cache.ttl_secs = MAX_CACHE_TTL_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\ncapacity = 8\nttl_secs = 1").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.cache.capacity, 8);
        assert_eq!(config.cache.ttl(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/brisk.toml"))).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
