use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Hours a user spent on a project, optionally against one task.
///
/// Billable value is `hours * hourly_rate`; entries without a rate bill nothing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TimeEntry {
    pub id: String,
    pub org_id: String,
    pub project_id: String,
    pub task_id: Option<String>,
    pub user_id: String,
    pub hours: BigDecimal,
    pub hourly_rate: Option<BigDecimal>,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
