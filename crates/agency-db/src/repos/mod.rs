//! Repository modules implementing operations for all agency entities.
//!
//! Each module adds methods to `AgencyService` via `impl AgencyService` blocks.
//! Every method takes the caller's `AuthContext` and scopes its SQL by `org_id`.

pub mod audit;
pub mod capacity;
pub mod dependency;
pub mod expense;
pub mod organization;
pub mod project;
pub mod task;
pub mod time_entry;
pub mod user;
