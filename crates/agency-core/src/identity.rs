use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;
use crate::errors::CoreError;

/// Authenticated caller, passed explicitly into every service operation.
///
/// Produced once per request (see `AgencyService::auth_context`) and never
/// re-fetched ambiently. Every query is scoped by `org_id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub org_id: String,
    pub role: Role,
}

impl AuthContext {
    #[must_use]
    pub fn new(user_id: impl Into<String>, org_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            org_id: org_id.into(),
            role,
        }
    }

    #[must_use]
    pub const fn is_manager(&self) -> bool {
        self.role.is_manager()
    }

    /// Fail with `CoreError::Forbidden` unless the caller is manager-level.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Forbidden` naming `action` for `member` callers.
    pub fn require_manager(&self, action: &str) -> Result<(), CoreError> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(CoreError::Forbidden {
                action: action.to_string(),
            })
        }
    }

    /// Allow the caller to act on a record owned by `owner_id`: managers act on
    /// anyone's, members only on their own.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Forbidden` when a member targets another user.
    pub fn require_self_or_manager(&self, owner_id: &str, action: &str) -> Result<(), CoreError> {
        if self.user_id == owner_id {
            Ok(())
        } else {
            self.require_manager(action)
        }
    }
}
