//! Organization repository: tenant bootstrap.

use chrono::Utc;

use agency_core::entities::{Organization, User};
use agency_core::enums::{AuditAction, EntityType, Role};
use agency_core::identity::AuthContext;
use agency_core::ids::{PREFIX_ORGANIZATION, PREFIX_USER};

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::repos::user::validate_user_fields;
use crate::service::AgencyService;

impl AgencyService {
    /// Create an organization together with its first admin user.
    ///
    /// This is the only operation without an `AuthContext`: nobody exists yet.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank names or a malformed email.
    pub async fn create_organization(
        &self,
        name: &str,
        admin_name: &str,
        admin_email: &str,
    ) -> Result<(Organization, User), DatabaseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DatabaseError::validation("organization name must not be empty"));
        }
        validate_user_fields(admin_name, admin_email, None)?;

        let now = Utc::now();
        let org_id = self.db().generate_id(PREFIX_ORGANIZATION).await?;
        let user_id = self.db().generate_id(PREFIX_USER).await?;

        self.db().conn().execute(
            "INSERT INTO organizations (id, name, created_at) VALUES (?1, ?2, ?3)",
            libsql::params![org_id.as_str(), name, now.to_rfc3339()],
        ).await?;

        self.db().conn().execute(
            "INSERT INTO users (id, org_id, name, email, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            libsql::params![
                user_id.as_str(),
                org_id.as_str(),
                admin_name.trim(),
                admin_email.trim(),
                Role::Admin.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        ).await?;

        let organization = Organization {
            id: org_id.clone(),
            name: name.to_string(),
            created_at: now,
        };
        let admin = User {
            id: user_id.clone(),
            org_id: org_id.clone(),
            name: admin_name.trim().to_string(),
            email: admin_email.trim().to_string(),
            role: Role::Admin,
            daily_capacity_hours: None,
            created_at: now,
            updated_at: now,
        };

        let ctx = AuthContext::new(user_id.as_str(), org_id.as_str(), Role::Admin);
        self.audit(&ctx, EntityType::Organization, &org_id, AuditAction::Created, None).await?;
        self.audit(&ctx, EntityType::User, &user_id, AuditAction::Created, None).await?;
        tracing::info!(org_id = %org_id, admin_id = %user_id, "organization created");

        Ok((organization, admin))
    }

    /// The caller's own organization.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the organization row is gone.
    pub async fn get_organization(&self, ctx: &AuthContext) -> Result<Organization, DatabaseError> {
        let mut rows = self.db().conn().query(
            "SELECT id, name, created_at FROM organizations WHERE id = ?1",
            [ctx.org_id.as_str()],
        ).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Organization, &ctx.org_id))?;
        Ok(Organization {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: parse_datetime(&row.get::<String>(2)?)?,
        })
    }
}
