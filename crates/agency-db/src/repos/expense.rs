//! Expense repository.

use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, Utc};

use agency_core::entities::Expense;
use agency_core::enums::{AuditAction, EntityType};
use agency_core::identity::AuthContext;
use agency_core::ids::PREFIX_EXPENSE;

use crate::error::DatabaseError;
use crate::helpers::{parse_date, parse_datetime, parse_decimal};
use crate::service::AgencyService;

const SELECT_COLS: &str = "id, org_id, project_id, amount, date, description, created_at";

fn row_to_expense(row: &libsql::Row) -> Result<Expense, DatabaseError> {
    Ok(Expense {
        id: row.get(0)?,
        org_id: row.get(1)?,
        project_id: row.get(2)?,
        amount: parse_decimal(&row.get::<String>(3)?)?,
        date: parse_date(&row.get::<String>(4)?)?,
        description: row.get(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl AgencyService {
    /// Record an expense against a project. Manager only.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `NotFound` for an unknown project, or a validation
    /// error for a non-positive amount or blank description.
    pub async fn create_expense(
        &self,
        ctx: &AuthContext,
        project_id: &str,
        amount: &BigDecimal,
        date: NaiveDate,
        description: &str,
    ) -> Result<Expense, DatabaseError> {
        ctx.require_manager("create expense")?;
        if amount <= &BigDecimal::zero() {
            return Err(DatabaseError::validation("expense amount must be positive"));
        }
        if description.trim().is_empty() {
            return Err(DatabaseError::validation("expense description must not be empty"));
        }
        self.get_project(ctx, project_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_EXPENSE).await?;

        self.db().conn().execute(
            &format!("INSERT INTO expenses ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            libsql::params![
                id.as_str(),
                ctx.org_id.as_str(),
                project_id,
                amount.to_string(),
                date.to_string(),
                description.trim(),
                now.to_rfc3339()
            ],
        ).await?;

        self.audit(ctx, EntityType::Expense, &id, AuditAction::Created, None).await?;

        Ok(Expense {
            id,
            org_id: ctx.org_id.clone(),
            project_id: project_id.to_string(),
            amount: amount.clone(),
            date,
            description: description.trim().to_string(),
            created_at: now,
        })
    }

    /// Expenses of one project, by date.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_project_expenses(
        &self,
        ctx: &AuthContext,
        project_id: &str,
    ) -> Result<Vec<Expense>, DatabaseError> {
        let mut rows = self.db().conn().query(
            &format!(
                "SELECT {SELECT_COLS} FROM expenses WHERE project_id = ?1 AND org_id = ?2
                 ORDER BY date, created_at, rowid"
            ),
            libsql::params![project_id, ctx.org_id.as_str()],
        ).await?;

        let mut expenses = Vec::new();
        while let Some(row) = rows.next().await? {
            expenses.push(row_to_expense(&row)?);
        }
        Ok(expenses)
    }

    /// # Errors
    ///
    /// Returns `Forbidden` or `NotFound`.
    pub async fn delete_expense(&self, ctx: &AuthContext, expense_id: &str) -> Result<(), DatabaseError> {
        ctx.require_manager("delete expense")?;
        let deleted = self.db().conn().execute(
            "DELETE FROM expenses WHERE id = ?1 AND org_id = ?2",
            libsql::params![expense_id, ctx.org_id.as_str()],
        ).await?;
        if deleted == 0 {
            return Err(DatabaseError::not_found(EntityType::Expense, expense_id));
        }

        self.audit(ctx, EntityType::Expense, expense_id, AuditAction::Deleted, None).await?;
        Ok(())
    }
}
