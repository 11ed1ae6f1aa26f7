//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Stock ledger behaviour.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

impl DatabaseConfig {
    /// Builds a configuration for the given URL with default pool sizes.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

/// How product balance writes behave when movements race each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyPolicy {
    /// Balance writes are conditional on the product version read during
    /// validation. A stale version aborts the whole movement.
    #[default]
    Optimistic,
    /// Balance writes overwrite unconditionally; the last committed
    /// movement wins.
    LastWriteWins,
}

/// Stock ledger configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LedgerConfig {
    /// Concurrency policy for balance writes.
    #[serde(default)]
    pub concurrency: ConcurrencyPolicy,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `STOCKLEDGER__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("STOCKLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test")),
                ("STOCKLEDGER__DATABASE__URL", Some("sqlite::memory:")),
                ("STOCKLEDGER__LEDGER__CONCURRENCY", Some("last_write_wins")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.database.min_connections, 1);
                assert_eq!(config.ledger.concurrency, ConcurrencyPolicy::LastWriteWins);
            },
        );
    }

    #[test]
    fn test_ledger_defaults_to_optimistic() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test")),
                ("STOCKLEDGER__DATABASE__URL", Some("postgres://localhost/stock")),
                ("STOCKLEDGER__LEDGER__CONCURRENCY", None),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.ledger.concurrency, ConcurrencyPolicy::Optimistic);
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test")),
                ("STOCKLEDGER__DATABASE__URL", None::<&str>),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_policy_deserialization() {
        let policy: ConcurrencyPolicy = serde_json::from_str("\"optimistic\"").unwrap();
        assert_eq!(policy, ConcurrencyPolicy::Optimistic);
        let policy: ConcurrencyPolicy = serde_json::from_str("\"last_write_wins\"").unwrap();
        assert_eq!(policy, ConcurrencyPolicy::LastWriteWins);
    }

    #[test]
    fn test_database_config_with_url() {
        let db = DatabaseConfig::with_url("sqlite::memory:");
        assert_eq!(db.url, "sqlite::memory:");
        assert_eq!(db.max_connections, 10);
    }
}
