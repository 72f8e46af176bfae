//! Response types returned as JSON by `agency` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Organization, Project, Task, TaskDependency, User};
use crate::rollup::ProjectFinancials;

/// Response from `agency init`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InitResponse {
    pub organization: Organization,
    pub admin: User,
}

/// A project together with its read-time rollup.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project: Project,
    pub financials: ProjectFinancials,
}

/// A task that cannot start yet, with the prerequisites still open.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BlockedTask {
    pub task: Task,
    pub blocked_by: Vec<String>,
}

/// Direct neighbours of one task in the dependency graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskDependencies {
    pub task_id: String,
    pub depends_on: Vec<TaskDependency>,
    pub dependents: Vec<TaskDependency>,
}

/// Response from `agency dep remove`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DependencyRemoved {
    pub dependent_id: String,
    pub depends_on_id: String,
    pub removed: bool,
}
