//! Task repository: CRUD and status changes.
//!
//! Status transitions are unrestricted; a changed status is additionally
//! audited as `status_changed`.

use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, Utc};

use agency_core::audit_detail::StatusChangedDetail;
use agency_core::entities::Task;
use agency_core::enums::{AuditAction, EntityType, TaskPriority, TaskStatus};
use agency_core::identity::AuthContext;
use agency_core::ids::PREFIX_TASK;

use crate::error::DatabaseError;
use crate::helpers::{
    date_value, decimal_value, get_opt_string, parse_datetime, parse_enum, parse_optional_date,
    parse_optional_decimal, text_value,
};
use crate::repos::audit::detail;
use crate::service::AgencyService;
use crate::updates::task::TaskUpdate;

pub(crate) const SELECT_COLS: &str = "id, org_id, project_id, title, description, status, priority, \
                                      start_date, due_date, estimated_hours, actual_hours, assignee_id, \
                                      created_at, updated_at";

pub(crate) fn row_to_task(row: &libsql::Row) -> Result<Task, DatabaseError> {
    Ok(Task {
        id: row.get(0)?,
        org_id: row.get(1)?,
        project_id: row.get(2)?,
        title: row.get(3)?,
        description: get_opt_string(row, 4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        priority: parse_enum(&row.get::<String>(6)?)?,
        start_date: parse_optional_date(get_opt_string(row, 7)?.as_deref())?,
        due_date: parse_optional_date(get_opt_string(row, 8)?.as_deref())?,
        estimated_hours: parse_optional_decimal(get_opt_string(row, 9)?.as_deref())?,
        actual_hours: parse_optional_decimal(get_opt_string(row, 10)?.as_deref())?,
        assignee_id: get_opt_string(row, 11)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
    })
}

/// Input for [`AgencyService::create_task`].
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<BigDecimal>,
    pub assignee_id: Option<String>,
}

impl NewTask {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

fn validate_task_fields(
    title: &str,
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    estimated_hours: Option<&BigDecimal>,
    actual_hours: Option<&BigDecimal>,
) -> Result<(), DatabaseError> {
    if title.trim().is_empty() {
        return Err(DatabaseError::validation("task title must not be empty"));
    }
    if let (Some(start), Some(due)) = (start_date, due_date)
        && due < start
    {
        return Err(DatabaseError::validation(format!(
            "task is due ({due}) before it starts ({start})"
        )));
    }
    for (field, hours) in [("estimated_hours", estimated_hours), ("actual_hours", actual_hours)] {
        if let Some(hours) = hours
            && hours < &BigDecimal::zero()
        {
            return Err(DatabaseError::validation(format!("{field} must not be negative")));
        }
    }
    Ok(())
}

impl AgencyService {
    /// Create a task inside one of the organization's projects.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown project or assignee, or a validation error.
    pub async fn create_task(
        &self,
        ctx: &AuthContext,
        project_id: &str,
        input: NewTask,
    ) -> Result<Task, DatabaseError> {
        validate_task_fields(
            &input.title,
            input.start_date,
            input.due_date,
            input.estimated_hours.as_ref(),
            None,
        )?;
        self.get_project(ctx, project_id).await?;
        if let Some(ref assignee) = input.assignee_id {
            self.get_user(ctx, assignee).await?;
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_TASK).await?;
        let task = Task {
            id: id.clone(),
            org_id: ctx.org_id.clone(),
            project_id: project_id.to_string(),
            title: input.title.trim().to_string(),
            description: input.description,
            status: input.status.unwrap_or(TaskStatus::ToDo),
            priority: input.priority.unwrap_or(TaskPriority::Medium),
            start_date: input.start_date,
            due_date: input.due_date,
            estimated_hours: input.estimated_hours,
            actual_hours: None,
            assignee_id: input.assignee_id,
            created_at: now,
            updated_at: now,
        };

        self.db().conn().execute(
            &format!(
                "INSERT INTO tasks ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
            ),
            libsql::params![
                task.id.as_str(),
                task.org_id.as_str(),
                task.project_id.as_str(),
                task.title.as_str(),
                task.description.as_deref(),
                task.status.as_str(),
                task.priority.as_str(),
                date_value(task.start_date),
                date_value(task.due_date),
                decimal_value(task.estimated_hours.as_ref()),
                libsql::Value::Null,
                task.assignee_id.as_deref(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        ).await?;

        self.audit(ctx, EntityType::Task, &id, AuditAction::Created, None).await?;
        Ok(task)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the task is not in the caller's org.
    pub async fn get_task(&self, ctx: &AuthContext, id: &str) -> Result<Task, DatabaseError> {
        let mut rows = self.db().conn().query(
            &format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1 AND org_id = ?2"),
            libsql::params![id, ctx.org_id.as_str()],
        ).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Task, id))?;
        row_to_task(&row)
    }

    /// Tasks of one project, ordered by start date (undated last) then creation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_project_tasks(
        &self,
        ctx: &AuthContext,
        project_id: &str,
    ) -> Result<Vec<Task>, DatabaseError> {
        let mut rows = self.db().conn().query(
            &format!(
                "SELECT {SELECT_COLS} FROM tasks WHERE project_id = ?1 AND org_id = ?2
                 ORDER BY start_date IS NULL, start_date, created_at, rowid"
            ),
            libsql::params![project_id, ctx.org_id.as_str()],
        ).await?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    /// Apply a partial update. An empty update returns the current record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown task or assignee, or a validation
    /// error for the merged record.
    pub async fn update_task(
        &self,
        ctx: &AuthContext,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<Task, DatabaseError> {
        let current = self.get_task(ctx, task_id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        validate_task_fields(
            update.title.as_deref().unwrap_or(&current.title),
            update.start_date.unwrap_or(current.start_date),
            update.due_date.unwrap_or(current.due_date),
            update
                .estimated_hours
                .as_ref()
                .map_or(current.estimated_hours.as_ref(), Option::as_ref),
            update
                .actual_hours
                .as_ref()
                .map_or(current.actual_hours.as_ref(), Option::as_ref),
        )?;
        if let Some(Some(ref assignee)) = update.assignee_id {
            self.get_user(ctx, assignee).await?;
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref title) = update.title {
            params.push(title.trim().into());
            sets.push(format!("title = ?{}", params.len()));
        }
        if let Some(ref description) = update.description {
            params.push(text_value(description.as_deref()));
            sets.push(format!("description = ?{}", params.len()));
        }
        if let Some(status) = update.status {
            params.push(status.as_str().into());
            sets.push(format!("status = ?{}", params.len()));
        }
        if let Some(priority) = update.priority {
            params.push(priority.as_str().into());
            sets.push(format!("priority = ?{}", params.len()));
        }
        if let Some(start_date) = update.start_date {
            params.push(date_value(start_date));
            sets.push(format!("start_date = ?{}", params.len()));
        }
        if let Some(due_date) = update.due_date {
            params.push(date_value(due_date));
            sets.push(format!("due_date = ?{}", params.len()));
        }
        if let Some(ref hours) = update.estimated_hours {
            params.push(decimal_value(hours.as_ref()));
            sets.push(format!("estimated_hours = ?{}", params.len()));
        }
        if let Some(ref hours) = update.actual_hours {
            params.push(decimal_value(hours.as_ref()));
            sets.push(format!("actual_hours = ?{}", params.len()));
        }
        if let Some(ref assignee) = update.assignee_id {
            params.push(text_value(assignee.as_deref()));
            sets.push(format!("assignee_id = ?{}", params.len()));
        }

        params.push(Utc::now().to_rfc3339().into());
        sets.push(format!("updated_at = ?{}", params.len()));

        params.push(task_id.into());
        let id_idx = params.len();
        params.push(ctx.org_id.as_str().into());
        let sql = format!(
            "UPDATE tasks SET {} WHERE id = ?{id_idx} AND org_id = ?{}",
            sets.join(", "),
            params.len()
        );
        self.db().conn().execute(&sql, libsql::params_from_iter(params)).await?;

        self.audit(ctx, EntityType::Task, task_id, AuditAction::Updated, Some(detail(&update)?))
            .await?;

        if let Some(status) = update.status
            && status != current.status
        {
            let change = StatusChangedDetail {
                from: current.status.as_str().to_string(),
                to: status.as_str().to_string(),
            };
            self.audit(
                ctx,
                EntityType::Task,
                task_id,
                AuditAction::StatusChanged,
                Some(detail(&change)?),
            )
            .await?;
            tracing::debug!(
                project_id = %current.project_id,
                task_id,
                "task status changed, project views revalidated"
            );
        }

        self.get_task(ctx, task_id).await
    }

    /// Delete a task; its dependency edges go with it. Manager only.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` or `NotFound`.
    pub async fn delete_task(&self, ctx: &AuthContext, task_id: &str) -> Result<(), DatabaseError> {
        ctx.require_manager("delete task")?;
        let task = self.get_task(ctx, task_id).await?;

        self.db().conn().execute(
            "DELETE FROM tasks WHERE id = ?1 AND org_id = ?2",
            libsql::params![task_id, ctx.org_id.as_str()],
        ).await?;

        self.audit(ctx, EntityType::Task, task_id, AuditAction::Deleted, None).await?;
        tracing::debug!(project_id = %task.project_id, task_id, "task deleted, project views revalidated");
        Ok(())
    }
}
