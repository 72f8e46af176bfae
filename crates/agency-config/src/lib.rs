//! # agency-config
//!
//! Layered configuration loading for the agency workbench using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`AGENCY_*` prefix, `__` as separator)
//! 2. Project-level `.agency/config.toml`
//! 3. User-level `~/.config/agency/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `AGENCY_DATABASE__PATH` -> `database.path`,
//! `AGENCY_PLANNING__CAPACITY_HORIZON_DAYS` -> `planning.capacity_horizon_days`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use agency_config::AgencyConfig;
//!
//! let config = AgencyConfig::load_with_dotenv(std::path::Path::new(".")).expect("config");
//! println!("horizon: {} days", config.planning.capacity_horizon_days);
//! ```

mod actor;
mod database;
mod error;
mod general;
mod planning;

pub use actor::ActorConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use planning::PlanningConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local directory holding the database and config file.
pub const PROJECT_DIR: &str = ".agency";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AgencyConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub planning: PlanningConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub actor: ActorConfig,
}

impl AgencyConfig {
    /// Load configuration for the project rooted at `project_root`.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the project root (falling back to the current
    /// directory), then load configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load_with_dotenv(project_root: &Path) -> Result<Self, ConfigError> {
        let env_path = project_root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        } else {
            let _ = dotenvy::dotenv();
        }
        Self::load(project_root)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    #[must_use]
    pub fn figment(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("AGENCY_").split("__"))
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.planning.validate()
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("agency").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = AgencyConfig::default();
        assert!(!config.actor.is_configured());
        assert_eq!(config.database.path, ".agency/agency.db");
        assert_eq!(config.planning.capacity_horizon_days, 30);
    }

    #[test]
    fn figment_builds_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config: AgencyConfig = AgencyConfig::figment(dir.path())
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.general.default_limit, 20);
        assert_eq!(config.planning.default_currency, "USD");
    }
}
