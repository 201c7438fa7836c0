//! # sima-config
//!
//! Layered configuration loading for SIMA using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SIMA_*` prefix, `__` as separator)
//! 2. Project-level `.sima/config.toml`
//! 3. User-level `~/.config/sima/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SIMA_DATABASE__PATH` -> `database.path`,
//! `SIMA_SCORING__CLIMATE` -> `scoring.climate`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use sima_config::SimaConfig;
//!
//! let config = SimaConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//! println!("store: {}", config.database.path);
//! ```

mod database;
mod error;
mod general;
mod scoring;
mod server;
mod workflow;

pub use database::{DatabaseConfig, IN_MEMORY};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use scoring::ScoringConfig;
pub use server::{Role, ServerConfig, TokenGrant};
pub use workflow::WorkflowConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimaConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl SimaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source cannot be parsed.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".sima/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("SIMA_").split("__"))
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring
            .check()
            .map_err(|(field, reason)| ConfigError::InvalidValue { field, reason })?;
        self.workflow
            .plan()
            .map_err(|reason| ConfigError::InvalidValue {
                field: "workflow.stages".into(),
                reason,
            })?;
        if self.workflow.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workflow.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.workflow.busy_retry_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workflow.busy_retry_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if let Some(token) = self
            .server
            .tokens
            .iter()
            .find_map(|(token, grant)| grant.principal.trim().is_empty().then_some(token))
        {
            return Err(ConfigError::InvalidValue {
                field: format!("server.tokens.{token}.principal"),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sima").join("config.toml"))
    }
}
