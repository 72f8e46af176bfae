//! Default acting user for CLI invocations.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ActorConfig {
    /// ID of the user commands run as, e.g. `usr-1a2b3c4d`.
    #[serde(default)]
    pub user_id: String,
}

impl ActorConfig {
    pub fn is_configured(&self) -> bool {
        !self.user_id.is_empty()
    }

    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when no user ID is set.
    pub fn require_user_id(&self) -> Result<&str, ConfigError> {
        if self.is_configured() {
            Ok(&self.user_id)
        } else {
            Err(ConfigError::NotConfigured {
                section: "actor".into(),
            })
        }
    }
}
