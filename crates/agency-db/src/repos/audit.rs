//! Audit trail repository.
//!
//! Append-only audit entries recording every mutation. Supports dynamic
//! filtering, always within the caller's organization.

use chrono::Utc;
use serde::Serialize;

use agency_core::entities::AuditEntry;
use agency_core::enums::{AuditAction, EntityType};
use agency_core::identity::AuthContext;
use agency_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::AgencyService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub actor_id: Option<String>,
    pub limit: Option<u32>,
}

/// Serialize an audit detail payload.
pub(crate) fn detail<T: Serialize>(value: &T) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(value).map_err(|e| DatabaseError::Other(e.into()))
}

impl AgencyService {
    /// Append an audit entry. Called by every mutation method.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn append_audit(&self, entry: &AuditEntry) -> Result<(), DatabaseError> {
        self.db().conn().execute(
            "INSERT INTO audit_trail (id, org_id, actor_id, entity_type, entity_id, action, detail, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            libsql::params![
                entry.id.as_str(),
                entry.org_id.as_str(),
                entry.actor_id.as_deref(),
                entry.entity_type.as_str(),
                entry.entity_id.as_str(),
                entry.action.as_str(),
                entry.detail.as_ref().map(std::string::ToString::to_string).as_deref(),
                entry.created_at.to_rfc3339()
            ],
        ).await?;
        Ok(())
    }

    /// Record `action` on an entity on behalf of `ctx`.
    pub(crate) async fn audit(
        &self,
        ctx: &AuthContext,
        entity_type: EntityType,
        entity_id: &str,
        action: AuditAction,
        detail: Option<serde_json::Value>,
    ) -> Result<(), DatabaseError> {
        let id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id,
            org_id: ctx.org_id.clone(),
            actor_id: Some(ctx.user_id.clone()),
            entity_type,
            entity_id: entity_id.to_string(),
            action,
            detail,
            created_at: Utc::now(),
        })
        .await
    }

    /// Query audit entries of the caller's organization, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(
        &self,
        ctx: &AuthContext,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut params: Vec<libsql::Value> = vec![libsql::Value::Text(ctx.org_id.clone())];
        let mut conditions = vec!["org_id = ?1".to_string()];

        if let Some(ref et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(ref action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(ref actor) = filter.actor_id {
            params.push(libsql::Value::Text(actor.clone()));
            conditions.push(format!("actor_id = ?{}", params.len()));
        }

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, org_id, actor_id, entity_type, entity_id, action, detail, created_at
             FROM audit_trail WHERE {}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}",
            conditions.join(" AND ")
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next().await? {
            entries.push(AuditEntry {
                id: row.get::<String>(0)?,
                org_id: row.get::<String>(1)?,
                actor_id: get_opt_string(&row, 2)?,
                entity_type: parse_enum(&row.get::<String>(3)?)?,
                entity_id: row.get::<String>(4)?,
                action: parse_enum(&row.get::<String>(5)?)?,
                detail: parse_optional_json(get_opt_string(&row, 6)?.as_deref())?,
                created_at: parse_datetime(&row.get::<String>(7)?)?,
            });
        }

        Ok(entries)
    }
}
