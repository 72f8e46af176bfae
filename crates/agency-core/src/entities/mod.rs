//! Entity structs for all agency domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `agency-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.
//!
//! Monetary amounts, hours, and rates are `BigDecimal`, serialized as strings.

mod audit;
mod dependency;
mod expense;
mod organization;
mod project;
mod task;
mod time_entry;
mod user;

pub use audit::AuditEntry;
pub use dependency::TaskDependency;
pub use expense::Expense;
pub use organization::Organization;
pub use project::Project;
pub use task::Task;
pub use time_entry::TimeEntry;
pub use user::User;
