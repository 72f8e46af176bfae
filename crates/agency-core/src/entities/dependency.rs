use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Directed edge: `dependent_id` depends on `depends_on_id`.
///
/// Unique per pair, never a self edge, and the edge set stays acyclic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskDependency {
    pub dependent_id: String,
    pub depends_on_id: String,
    pub created_at: DateTime<Utc>,
}
