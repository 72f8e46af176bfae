//! User repository: members, roles, and daily capacity.

use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;

use agency_core::audit_detail::CapacityChangedDetail;
use agency_core::entities::User;
use agency_core::enums::{AuditAction, EntityType, Role};
use agency_core::identity::AuthContext;
use agency_core::ids::PREFIX_USER;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_decimal};
use crate::repos::audit::detail;
use crate::service::AgencyService;

const SELECT_COLS: &str =
    "id, org_id, name, email, role, daily_capacity_hours, created_at, updated_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        org_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        role: parse_enum(&row.get::<String>(4)?)?,
        daily_capacity_hours: parse_optional_decimal(get_opt_string(row, 5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

pub(crate) fn validate_capacity(hours: Option<&BigDecimal>) -> Result<(), DatabaseError> {
    if let Some(hours) = hours
        && (hours < &BigDecimal::zero() || hours > &BigDecimal::from(24))
    {
        return Err(DatabaseError::validation(format!(
            "daily capacity must be between 0 and 24 hours, got {hours}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_user_fields(
    name: &str,
    email: &str,
    capacity: Option<&BigDecimal>,
) -> Result<(), DatabaseError> {
    if name.trim().is_empty() {
        return Err(DatabaseError::validation("user name must not be empty"));
    }
    let email = email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(DatabaseError::validation(format!("invalid email address '{email}'")));
    }
    validate_capacity(capacity)
}

impl AgencyService {
    /// Resolve the authorization context for `user_id`.
    ///
    /// This is the one lookup that is not org-scoped: it establishes the org.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown user.
    pub async fn auth_context(&self, user_id: &str) -> Result<AuthContext, DatabaseError> {
        let mut rows = self.db().conn().query(
            "SELECT id, org_id, role FROM users WHERE id = ?1",
            [user_id],
        ).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::User, user_id))?;
        Ok(AuthContext {
            user_id: row.get(0)?,
            org_id: row.get(1)?,
            role: parse_enum(&row.get::<String>(2)?)?,
        })
    }

    /// Add a user to the caller's organization. Manager only.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for members, a validation error for bad input, or a
    /// libSQL error if the email is already taken in this organization.
    pub async fn create_user(
        &self,
        ctx: &AuthContext,
        name: &str,
        email: &str,
        role: Role,
        daily_capacity_hours: Option<&BigDecimal>,
    ) -> Result<User, DatabaseError> {
        ctx.require_manager("create user")?;
        validate_user_fields(name, email, daily_capacity_hours)?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;

        self.db().conn().execute(
            &format!("INSERT INTO users ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            libsql::params![
                id.as_str(),
                ctx.org_id.as_str(),
                name.trim(),
                email.trim(),
                role.as_str(),
                daily_capacity_hours.map(ToString::to_string),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        ).await?;

        self.audit(ctx, EntityType::User, &id, AuditAction::Created, None).await?;

        Ok(User {
            id,
            org_id: ctx.org_id.clone(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            role,
            daily_capacity_hours: daily_capacity_hours.cloned(),
            created_at: now,
            updated_at: now,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the user is not in the caller's org.
    pub async fn get_user(&self, ctx: &AuthContext, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self.db().conn().query(
            &format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1 AND org_id = ?2"),
            libsql::params![id, ctx.org_id.as_str()],
        ).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::User, id))?;
        row_to_user(&row)
    }

    /// All users of the caller's organization, by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_users(&self, ctx: &AuthContext) -> Result<Vec<User>, DatabaseError> {
        let mut rows = self.db().conn().query(
            &format!("SELECT {SELECT_COLS} FROM users WHERE org_id = ?1 ORDER BY name, id"),
            [ctx.org_id.as_str()],
        ).await?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    /// Set or clear a user's daily capacity. Manager only.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `NotFound`, or a validation error for hours outside 0..=24.
    pub async fn set_user_capacity(
        &self,
        ctx: &AuthContext,
        user_id: &str,
        hours: Option<&BigDecimal>,
    ) -> Result<User, DatabaseError> {
        ctx.require_manager("set user capacity")?;
        validate_capacity(hours)?;
        let current = self.get_user(ctx, user_id).await?;

        let now = Utc::now();
        self.db().conn().execute(
            "UPDATE users SET daily_capacity_hours = ?1, updated_at = ?2 WHERE id = ?3 AND org_id = ?4",
            libsql::params![
                hours.map(ToString::to_string),
                now.to_rfc3339(),
                user_id,
                ctx.org_id.as_str()
            ],
        ).await?;

        let change = CapacityChangedDetail {
            from: current.daily_capacity_hours.as_ref().map(ToString::to_string),
            to: hours.map(ToString::to_string),
        };
        self.audit(ctx, EntityType::User, user_id, AuditAction::Updated, Some(detail(&change)?))
            .await?;

        self.get_user(ctx, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{dec, other_org, studio};
    use agency_core::errors::CoreError;
    use rstest::rstest;

    #[tokio::test]
    async fn create_and_get_user() {
        let s = studio().await;
        let user = s
            .svc
            .create_user(&s.manager, "Noor", "noor@brightline.test", Role::Member, Some(&dec("6")))
            .await
            .unwrap();

        let fetched = s.svc.get_user(&s.member, &user.id).await.unwrap();
        assert_eq!(fetched.name, "Noor");
        assert_eq!(fetched.daily_capacity_hours, Some(dec("6")));
        assert_eq!(fetched.role, Role::Member);
    }

    #[tokio::test]
    async fn members_cannot_create_users() {
        let s = studio().await;
        let result = s
            .svc
            .create_user(&s.member, "Noor", "noor@brightline.test", Role::Member, None)
            .await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::Forbidden { .. }))
        ));
    }

    #[rstest]
    #[case("", "x@y.test")]
    #[case("Noor", "not-an-email")]
    #[case("Noor", "@brightline.test")]
    #[tokio::test]
    async fn invalid_user_fields(#[case] name: &str, #[case] email: &str) {
        let s = studio().await;
        let result = s.svc.create_user(&s.admin, name, email, Role::Member, None).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn list_users_only_own_org() {
        let s = studio().await;
        let rival = other_org(&s.svc).await;

        let ours = s.svc.list_users(&s.member).await.unwrap();
        assert_eq!(ours.len(), 3);
        assert!(ours.iter().all(|u| u.org_id == s.member.org_id));

        let result = s.svc.get_user(&rival, &s.member.user_id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn set_capacity_is_audited() {
        let s = studio().await;
        let user = s
            .svc
            .set_user_capacity(&s.manager, &s.member.user_id, Some(&dec("7.5")))
            .await
            .unwrap();
        assert_eq!(user.daily_capacity_hours, Some(dec("7.5")));

        let entries = s
            .svc
            .query_audit(
                &s.manager,
                &AuditFilter {
                    entity_id: Some(s.member.user_id.clone()),
                    action: Some(AuditAction::Updated),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].detail,
            Some(serde_json::json!({"from": null, "to": "7.5"}))
        );

        let too_many = s
            .svc
            .set_user_capacity(&s.manager, &s.member.user_id, Some(&dec("25")))
            .await;
        assert!(too_many.is_err());
    }

    #[tokio::test]
    async fn unknown_user_has_no_context() {
        let s = studio().await;
        let result = s.svc.auth_context("usr-00000000").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
