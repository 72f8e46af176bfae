//! Capacity reports over the organization's upcoming, estimated work.

use chrono::NaiveDate;

use agency_core::capacity::{CapacityReport, plan_capacity, plan_user};
use agency_core::entities::Task;
use agency_core::identity::AuthContext;

use crate::error::DatabaseError;
use crate::repos::task::{SELECT_COLS, row_to_task};
use crate::service::AgencyService;

impl AgencyService {
    /// Assigned, estimated tasks starting on or after `today`.
    async fn upcoming_assigned_tasks(
        &self,
        ctx: &AuthContext,
        today: NaiveDate,
    ) -> Result<Vec<Task>, DatabaseError> {
        let mut rows = self.db().conn().query(
            &format!(
                "SELECT {SELECT_COLS} FROM tasks
                 WHERE org_id = ?1 AND assignee_id IS NOT NULL
                   AND estimated_hours IS NOT NULL
                   AND start_date IS NOT NULL AND start_date >= ?2
                 ORDER BY start_date, rowid"
            ),
            libsql::params![ctx.org_id.as_str(), today.to_string()],
        ).await?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    /// Workload against availability for every user of the organization.
    /// Manager only. The horizon is `planning.capacity_horizon_days`.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for members.
    pub async fn capacity_report(
        &self,
        ctx: &AuthContext,
        today: NaiveDate,
    ) -> Result<Vec<CapacityReport>, DatabaseError> {
        ctx.require_manager("view team capacity")?;
        let users = self.list_users(ctx).await?;
        let tasks = self.upcoming_assigned_tasks(ctx, today).await?;
        tracing::debug!(users = users.len(), tasks = tasks.len(), %today, "planning capacity");
        Ok(plan_capacity(
            &users,
            &tasks,
            today,
            self.planning().capacity_horizon_days,
        ))
    }

    /// One user's report. Members may view only their own.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` or `NotFound`.
    pub async fn user_capacity(
        &self,
        ctx: &AuthContext,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<CapacityReport, DatabaseError> {
        ctx.require_self_or_manager(user_id, "view another user's capacity")?;
        let user = self.get_user(ctx, user_id).await?;
        let tasks = self.upcoming_assigned_tasks(ctx, today).await?;
        Ok(plan_user(
            &user,
            &tasks,
            today,
            self.planning().capacity_horizon_days,
        ))
    }
}
