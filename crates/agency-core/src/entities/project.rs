use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ProjectStatus;

/// A client engagement. Financial totals are derived at read time, see
/// [`crate::rollup::ProjectFinancials`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub status: ProjectStatus,
    pub budget: Option<BigDecimal>,
    /// ISO 4217 code, e.g. `USD`.
    pub currency: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
