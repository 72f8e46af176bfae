//! Time entry repository.
//!
//! Members log their own hours; managers may log or delete hours for anyone.

use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, Utc};

use agency_core::entities::TimeEntry;
use agency_core::enums::{AuditAction, EntityType};
use agency_core::identity::AuthContext;
use agency_core::ids::PREFIX_TIME_ENTRY;

use crate::error::DatabaseError;
use crate::helpers::{
    decimal_value, get_opt_string, parse_date, parse_datetime, parse_decimal,
    parse_optional_decimal,
};
use crate::service::AgencyService;

const SELECT_COLS: &str =
    "id, org_id, project_id, task_id, user_id, hours, hourly_rate, date, description, created_at";

fn row_to_time_entry(row: &libsql::Row) -> Result<TimeEntry, DatabaseError> {
    Ok(TimeEntry {
        id: row.get(0)?,
        org_id: row.get(1)?,
        project_id: row.get(2)?,
        task_id: get_opt_string(row, 3)?,
        user_id: row.get(4)?,
        hours: parse_decimal(&row.get::<String>(5)?)?,
        hourly_rate: parse_optional_decimal(get_opt_string(row, 6)?.as_deref())?,
        date: parse_date(&row.get::<String>(7)?)?,
        description: get_opt_string(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

/// Input for [`AgencyService::log_time`].
#[derive(Debug, Clone)]
pub struct NewTimeEntry {
    pub project_id: String,
    pub task_id: Option<String>,
    /// Defaults to the caller.
    pub user_id: Option<String>,
    pub hours: BigDecimal,
    pub hourly_rate: Option<BigDecimal>,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl NewTimeEntry {
    #[must_use]
    pub fn new(project_id: impl Into<String>, hours: BigDecimal, date: NaiveDate) -> Self {
        Self {
            project_id: project_id.into(),
            task_id: None,
            user_id: None,
            hours,
            hourly_rate: None,
            date,
            description: None,
        }
    }
}

impl AgencyService {
    /// Log hours against a project and optionally one of its tasks.
    ///
    /// # Errors
    ///
    /// `Forbidden` when a member logs for someone else, `NotFound` for an
    /// unknown project, task, or user, and a validation error for
    /// non-positive hours, a negative rate, or a task of another project.
    pub async fn log_time(
        &self,
        ctx: &AuthContext,
        input: NewTimeEntry,
    ) -> Result<TimeEntry, DatabaseError> {
        let user_id = input.user_id.unwrap_or_else(|| ctx.user_id.clone());
        ctx.require_self_or_manager(&user_id, "log time for another user")?;

        if input.hours <= BigDecimal::zero() {
            return Err(DatabaseError::validation("logged hours must be positive"));
        }
        if let Some(ref rate) = input.hourly_rate
            && rate < &BigDecimal::zero()
        {
            return Err(DatabaseError::validation("hourly rate must not be negative"));
        }

        self.get_project(ctx, &input.project_id).await?;
        self.get_user(ctx, &user_id).await?;
        if let Some(ref task_id) = input.task_id {
            let task = self.get_task(ctx, task_id).await?;
            if task.project_id != input.project_id {
                return Err(DatabaseError::validation(format!(
                    "task {task_id} does not belong to project {}",
                    input.project_id
                )));
            }
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_TIME_ENTRY).await?;
        let entry = TimeEntry {
            id: id.clone(),
            org_id: ctx.org_id.clone(),
            project_id: input.project_id,
            task_id: input.task_id,
            user_id,
            hours: input.hours,
            hourly_rate: input.hourly_rate,
            date: input.date,
            description: input.description,
            created_at: now,
        };

        self.db().conn().execute(
            &format!(
                "INSERT INTO time_entries ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            libsql::params![
                entry.id.as_str(),
                entry.org_id.as_str(),
                entry.project_id.as_str(),
                entry.task_id.as_deref(),
                entry.user_id.as_str(),
                entry.hours.to_string(),
                decimal_value(entry.hourly_rate.as_ref()),
                entry.date.to_string(),
                entry.description.as_deref(),
                now.to_rfc3339()
            ],
        ).await?;

        self.audit(ctx, EntityType::TimeEntry, &id, AuditAction::Created, None).await?;
        Ok(entry)
    }

    /// Time entries of one project, by date.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_project_time_entries(
        &self,
        ctx: &AuthContext,
        project_id: &str,
    ) -> Result<Vec<TimeEntry>, DatabaseError> {
        let mut rows = self.db().conn().query(
            &format!(
                "SELECT {SELECT_COLS} FROM time_entries WHERE project_id = ?1 AND org_id = ?2
                 ORDER BY date, created_at, rowid"
            ),
            libsql::params![project_id, ctx.org_id.as_str()],
        ).await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_time_entry(&row)?);
        }
        Ok(entries)
    }

    /// Delete a time entry. Members may delete only their own.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn delete_time_entry(&self, ctx: &AuthContext, entry_id: &str) -> Result<(), DatabaseError> {
        let mut rows = self.db().conn().query(
            "SELECT user_id FROM time_entries WHERE id = ?1 AND org_id = ?2",
            libsql::params![entry_id, ctx.org_id.as_str()],
        ).await?;
        let owner: String = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::TimeEntry, entry_id))?
            .get(0)?;
        ctx.require_self_or_manager(&owner, "delete another user's time entry")?;

        self.db().conn().execute(
            "DELETE FROM time_entries WHERE id = ?1 AND org_id = ?2",
            libsql::params![entry_id, ctx.org_id.as_str()],
        ).await?;

        self.audit(ctx, EntityType::TimeEntry, entry_id, AuditAction::Deleted, None).await?;
        Ok(())
    }
}
