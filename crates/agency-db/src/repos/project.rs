//! Project repository: CRUD plus read-time financial rollups.

use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, Utc};

use agency_core::entities::Project;
use agency_core::enums::{AuditAction, EntityType, ProjectStatus};
use agency_core::identity::AuthContext;
use agency_core::ids::PREFIX_PROJECT;
use agency_core::responses::ProjectSummary;
use agency_core::rollup::ProjectFinancials;

use crate::error::DatabaseError;
use crate::helpers::{
    date_value, decimal_value, get_opt_string, parse_datetime, parse_enum, parse_optional_date,
    parse_optional_decimal, text_value,
};
use crate::repos::audit::detail;
use crate::service::AgencyService;
use crate::updates::project::ProjectUpdate;

const SELECT_COLS: &str = "id, org_id, name, description, client_name, status, budget, currency, \
                           start_date, end_date, created_at, updated_at";

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        id: row.get(0)?,
        org_id: row.get(1)?,
        name: row.get(2)?,
        description: get_opt_string(row, 3)?,
        client_name: get_opt_string(row, 4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        budget: parse_optional_decimal(get_opt_string(row, 6)?.as_deref())?,
        currency: row.get(7)?,
        start_date: parse_optional_date(get_opt_string(row, 8)?.as_deref())?,
        end_date: parse_optional_date(get_opt_string(row, 9)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

/// Input for [`AgencyService::create_project`].
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub budget: Option<BigDecimal>,
    /// Falls back to `planning.default_currency`.
    pub currency: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NewProject {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

fn validate_project_fields(
    name: &str,
    budget: Option<&BigDecimal>,
    currency: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<(), DatabaseError> {
    if name.trim().is_empty() {
        return Err(DatabaseError::validation("project name must not be empty"));
    }
    if let Some(budget) = budget
        && budget < &BigDecimal::zero()
    {
        return Err(DatabaseError::validation("project budget must not be negative"));
    }
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(DatabaseError::validation(format!(
            "'{currency}' is not a 3-letter ISO currency code"
        )));
    }
    if let (Some(start), Some(end)) = (start_date, end_date)
        && end < start
    {
        return Err(DatabaseError::validation(format!(
            "project ends ({end}) before it starts ({start})"
        )));
    }
    Ok(())
}

impl AgencyService {
    /// Create a project in the caller's organization. Manager only.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for members or a validation error for bad input.
    pub async fn create_project(
        &self,
        ctx: &AuthContext,
        input: NewProject,
    ) -> Result<Project, DatabaseError> {
        ctx.require_manager("create project")?;
        let currency = input
            .currency
            .unwrap_or_else(|| self.planning().default_currency.clone())
            .to_ascii_uppercase();
        validate_project_fields(
            &input.name,
            input.budget.as_ref(),
            &currency,
            input.start_date,
            input.end_date,
        )?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PROJECT).await?;
        let project = Project {
            id: id.clone(),
            org_id: ctx.org_id.clone(),
            name: input.name.trim().to_string(),
            description: input.description,
            client_name: input.client_name,
            status: input.status.unwrap_or(ProjectStatus::Planning),
            budget: input.budget,
            currency,
            start_date: input.start_date,
            end_date: input.end_date,
            created_at: now,
            updated_at: now,
        };

        self.db().conn().execute(
            &format!(
                "INSERT INTO projects ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
            ),
            libsql::params![
                project.id.as_str(),
                project.org_id.as_str(),
                project.name.as_str(),
                project.description.as_deref(),
                project.client_name.as_deref(),
                project.status.as_str(),
                decimal_value(project.budget.as_ref()),
                project.currency.as_str(),
                date_value(project.start_date),
                date_value(project.end_date),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        ).await?;

        self.audit(ctx, EntityType::Project, &id, AuditAction::Created, None).await?;
        Ok(project)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the project is not in the caller's org.
    pub async fn get_project(&self, ctx: &AuthContext, id: &str) -> Result<Project, DatabaseError> {
        let mut rows = self.db().conn().query(
            &format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1 AND org_id = ?2"),
            libsql::params![id, ctx.org_id.as_str()],
        ).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Project, id))?;
        row_to_project(&row)
    }

    /// Projects of the caller's organization, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_projects(
        &self,
        ctx: &AuthContext,
        limit: u32,
    ) -> Result<Vec<Project>, DatabaseError> {
        let mut rows = self.db().conn().query(
            &format!(
                "SELECT {SELECT_COLS} FROM projects WHERE org_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
            ),
            [ctx.org_id.as_str()],
        ).await?;

        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        Ok(projects)
    }

    /// Apply a partial update. Manager only. An empty update returns the
    /// current record unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `NotFound`, or a validation error for the merged record.
    pub async fn update_project(
        &self,
        ctx: &AuthContext,
        project_id: &str,
        update: ProjectUpdate,
    ) -> Result<Project, DatabaseError> {
        ctx.require_manager("update project")?;
        let current = self.get_project(ctx, project_id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        let currency = update
            .currency
            .as_ref()
            .map(|c| c.to_ascii_uppercase());
        validate_project_fields(
            update.name.as_deref().unwrap_or(&current.name),
            update.budget.clone().unwrap_or(current.budget).as_ref(),
            currency.as_deref().unwrap_or(&current.currency),
            update.start_date.unwrap_or(current.start_date),
            update.end_date.unwrap_or(current.end_date),
        )?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref name) = update.name {
            params.push(name.trim().into());
            sets.push(format!("name = ?{}", params.len()));
        }
        if let Some(ref description) = update.description {
            params.push(text_value(description.as_deref()));
            sets.push(format!("description = ?{}", params.len()));
        }
        if let Some(ref client_name) = update.client_name {
            params.push(text_value(client_name.as_deref()));
            sets.push(format!("client_name = ?{}", params.len()));
        }
        if let Some(status) = update.status {
            params.push(status.as_str().into());
            sets.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref budget) = update.budget {
            params.push(decimal_value(budget.as_ref()));
            sets.push(format!("budget = ?{}", params.len()));
        }
        if let Some(currency) = currency {
            params.push(currency.into());
            sets.push(format!("currency = ?{}", params.len()));
        }
        if let Some(start_date) = update.start_date {
            params.push(date_value(start_date));
            sets.push(format!("start_date = ?{}", params.len()));
        }
        if let Some(end_date) = update.end_date {
            params.push(date_value(end_date));
            sets.push(format!("end_date = ?{}", params.len()));
        }

        params.push(Utc::now().to_rfc3339().into());
        sets.push(format!("updated_at = ?{}", params.len()));

        params.push(project_id.into());
        let id_idx = params.len();
        params.push(ctx.org_id.as_str().into());
        let sql = format!(
            "UPDATE projects SET {} WHERE id = ?{id_idx} AND org_id = ?{}",
            sets.join(", "),
            params.len()
        );
        self.db().conn().execute(&sql, libsql::params_from_iter(params)).await?;

        self.audit(
            ctx,
            EntityType::Project,
            project_id,
            AuditAction::Updated,
            Some(detail(&update)?),
        )
        .await?;

        self.get_project(ctx, project_id).await
    }

    /// Delete a project and, by cascade, its tasks, dependencies, expenses and
    /// time entries. Manager only.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` or `NotFound`.
    pub async fn delete_project(&self, ctx: &AuthContext, project_id: &str) -> Result<(), DatabaseError> {
        ctx.require_manager("delete project")?;
        let deleted = self.db().conn().execute(
            "DELETE FROM projects WHERE id = ?1 AND org_id = ?2",
            libsql::params![project_id, ctx.org_id.as_str()],
        ).await?;
        if deleted == 0 {
            return Err(DatabaseError::not_found(EntityType::Project, project_id));
        }

        self.audit(ctx, EntityType::Project, project_id, AuditAction::Deleted, None).await?;
        Ok(())
    }

    /// Budget, expenses, billable time, and profitability of one project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the project is not in the caller's org.
    pub async fn project_financials(
        &self,
        ctx: &AuthContext,
        project_id: &str,
    ) -> Result<ProjectFinancials, DatabaseError> {
        let project = self.get_project(ctx, project_id).await?;
        self.financials_for(ctx, &project).await
    }

    /// Every project of the organization with its rollup.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn list_project_summaries(
        &self,
        ctx: &AuthContext,
        limit: u32,
    ) -> Result<Vec<ProjectSummary>, DatabaseError> {
        let projects = self.list_projects(ctx, limit).await?;
        let mut summaries = Vec::with_capacity(projects.len());
        for project in projects {
            let financials = self.financials_for(ctx, &project).await?;
            summaries.push(ProjectSummary { project, financials });
        }
        Ok(summaries)
    }

    async fn financials_for(
        &self,
        ctx: &AuthContext,
        project: &Project,
    ) -> Result<ProjectFinancials, DatabaseError> {
        let expenses = self.list_project_expenses(ctx, &project.id).await?;
        let time_entries = self.list_project_time_entries(ctx, &project.id).await?;
        Ok(ProjectFinancials::compute(
            project.budget.as_ref(),
            &expenses,
            &time_entries,
        ))
    }
}
