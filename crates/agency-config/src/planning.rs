//! Capacity planning and project defaults.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_capacity_horizon_days() -> u32 {
    30
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlanningConfig {
    /// Days of availability compared against upcoming workload.
    #[serde(default = "default_capacity_horizon_days")]
    pub capacity_horizon_days: u32,

    /// Currency assigned to new projects when none is given.
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            capacity_horizon_days: default_capacity_horizon_days(),
            default_currency: default_currency(),
        }
    }
}

impl PlanningConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero horizon or a currency
    /// that is not three ASCII letters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity_horizon_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "planning.capacity_horizon_days".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.default_currency.len() != 3
            || !self.default_currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(ConfigError::InvalidValue {
                field: "planning.default_currency".into(),
                reason: format!("'{}' is not a 3-letter currency code", self.default_currency),
            });
        }
        Ok(())
    }
}
