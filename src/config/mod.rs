//! Application configuration module
//!
//! Configuration is loaded with the `config` and `dotenvy` crates from an
//! optional YAML file followed by environment variables with the
//! `PROGRESSIVE_PROFILE` prefix. Nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use progressive_profile::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Storage backend: {}", config.storage.backend);
//! ```

mod consolidation;
mod database;
mod error;
mod logging;
mod storage;

pub use consolidation::ConsolidationConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_FILE_ENV: &str = "PROGRESSIVE_PROFILE_CONFIG";

const ENV_PREFIX: &str = "PROGRESSIVE_PROFILE";

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Consolidation policy and weighting table
    #[serde(default)]
    pub consolidation: ConsolidationConfig,

    /// Profile store selection
    #[serde(default)]
    pub storage: StorageConfig,

    /// PostgreSQL connection, required for the `postgres` backend
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads the YAML file named by `PROGRESSIVE_PROFILE_CONFIG`, if set
    /// 3. Overlays environment variables with `PROGRESSIVE_PROFILE` prefix
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PROGRESSIVE_PROFILE__STORAGE__BACKEND=filesystem` -> `storage.backend`
    /// - `PROGRESSIVE_PROFILE__DATABASE__URL=...` -> `database.url`
    /// - `PROGRESSIVE_PROFILE__CONSOLIDATION__POLICY__CONTEXT_POINTS=60,90,95`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or values cannot be
    /// parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let path = std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from);
        Self::load_from(path.as_deref())
    }

    /// Load configuration from an explicit YAML file (if any) overlaid with
    /// environment variables. Does not read `.env`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or values cannot be
    /// parsed into expected types.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            );
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("consolidation.policy.context_points"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid, or
    /// if the `postgres` backend is selected without a database section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.consolidation.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;

        match (&self.database, self.storage.backend) {
            (Some(database), _) => database.validate()?,
            (None, StorageBackend::Postgres) => {
                return Err(ValidationError::MissingRequired("DATABASE__URL"))
            }
            (None, _) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        CONFIG_FILE_ENV,
        "PROGRESSIVE_PROFILE__STORAGE__BACKEND",
        "PROGRESSIVE_PROFILE__STORAGE__MAX_SAVE_RETRIES",
        "PROGRESSIVE_PROFILE__DATABASE__URL",
        "PROGRESSIVE_PROFILE__LOGGING__JSON",
        "PROGRESSIVE_PROFILE__CONSOLIDATION__POLICY__CORROBORATION_BONUS",
        "PROGRESSIVE_PROFILE__CONSOLIDATION__POLICY__CONTEXT_POINTS",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.max_save_retries, 3);
        assert!(config.database.is_none());
        assert_eq!(config.consolidation.policy.corroboration_bonus, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("PROGRESSIVE_PROFILE__STORAGE__BACKEND", "postgres");
        env::set_var("PROGRESSIVE_PROFILE__STORAGE__MAX_SAVE_RETRIES", "5");
        env::set_var(
            "PROGRESSIVE_PROFILE__DATABASE__URL",
            "postgresql://test@localhost/profiles",
        );
        env::set_var("PROGRESSIVE_PROFILE__LOGGING__JSON", "true");
        env::set_var(
            "PROGRESSIVE_PROFILE__CONSOLIDATION__POLICY__CORROBORATION_BONUS",
            "5",
        );
        env::set_var(
            "PROGRESSIVE_PROFILE__CONSOLIDATION__POLICY__CONTEXT_POINTS",
            "50,80,90",
        );
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.storage.max_save_retries, 5);
        assert!(config.logging.json);
        assert_eq!(
            config.database.as_ref().map(|d| d.url.as_str()),
            Some("postgresql://test@localhost/profiles")
        );
        assert_eq!(config.consolidation.policy.corroboration_bonus, 5.0);
        assert_eq!(config.consolidation.policy.context_points, vec![50.0, 80.0, 90.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_file_source() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            "storage:\n  backend: filesystem\n  data_dir: /var/lib/profiles\nlogging:\n  filter: debug\n"
        )
        .unwrap();
        env::set_var(CONFIG_FILE_ENV, file.path());
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Filesystem);
        assert_eq!(
            config.storage.data_dir,
            std::path::PathBuf::from("/var/lib/profiles")
        );
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_postgres_backend_requires_database() {
        let config = AppConfig {
            storage: StorageConfig {
                backend: StorageBackend::Postgres,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }
}
