//! Service layer orchestrating database mutations with authorization and audit.
//!
//! `AgencyService` wraps `AgencyDb` (raw database access) together with the
//! planning settings the read-time calculations need. All repo methods are
//! implemented as `impl AgencyService` blocks in [`crate::repos`].

use agency_config::PlanningConfig;

use crate::AgencyDb;
use crate::error::DatabaseError;

/// Orchestrates database mutations with an audit trail.
///
/// Every mutation method follows this protocol:
/// 1. Check the caller's role on the `AuthContext`
/// 2. Validate input and resolve referenced records inside the caller's org
/// 3. Execute SQL
/// 4. Append an audit entry
pub struct AgencyService {
    db: AgencyDb,
    planning: PlanningConfig,
}

impl AgencyService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `planning` - Capacity horizon and default currency.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, planning: PlanningConfig) -> Result<Self, DatabaseError> {
        let db = AgencyDb::open_local(db_path).await?;
        Ok(Self { db, planning })
    }

    /// Create from an existing `AgencyDb` (for testing).
    #[must_use]
    pub const fn from_db(db: AgencyDb, planning: PlanningConfig) -> Self {
        Self { db, planning }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &AgencyDb {
        &self.db
    }

    #[must_use]
    pub const fn planning(&self) -> &PlanningConfig {
        &self.planning
    }
}
