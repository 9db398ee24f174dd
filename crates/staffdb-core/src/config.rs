//! Configuration for opening a staffdb session
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `STAFFDB__`-prefixed environment variables
//! (`STAFFDB__DATABASE__PATH`, `STAFFDB__DATABASE__FOREIGN_KEYS`,
//! `STAFFDB__LOGGING__PROFILE`).

use serde::Deserialize;
use std::path::Path;

use crate::errors::{ExError, StaffError};
use crate::logging_facility::Profile;

/// Path value that selects a private in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file, or `:memory:`
    #[serde(default = "default_path")]
    pub path: String,

    /// Issue `PRAGMA foreign_keys = ON` when the connection opens
    #[serde(default = "default_foreign_keys")]
    pub foreign_keys: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub profile: Profile,
}

fn default_path() -> String {
    IN_MEMORY_PATH.to_string()
}

fn default_foreign_keys() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            foreign_keys: default_foreign_keys(),
        }
    }
}

impl StaffConfig {
    /// Load configuration from an optional file plus the environment
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a source cannot be read or parsed, or if
    /// validation fails.
    pub fn load(file: Option<&Path>) -> Result<Self, ExError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("STAFFDB")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse configuration from TOML text, ignoring the environment
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML or failed validation.
    pub fn from_toml_str(toml: &str) -> Result<Self, ExError> {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check values the type system cannot
    ///
    /// # Errors
    ///
    /// Returns `StaffError::InvalidConfig` when the database path is blank.
    pub fn validate(&self) -> Result<(), StaffError> {
        if self.database.path.trim().is_empty() {
            return Err(StaffError::InvalidConfig {
                reason: "database.path must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }
}
