use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Expense {
    pub id: String,
    pub org_id: String,
    pub project_id: String,
    pub amount: BigDecimal,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
