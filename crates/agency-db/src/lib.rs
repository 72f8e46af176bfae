//! # agency-db
//!
//! libSQL persistence for the agency workbench.
//!
//! Handles all relational state: organizations, users, projects, tasks, the
//! task dependency graph, expenses, time entries, and the audit trail. Every
//! table carries an `org_id` and every repo query is scoped by it.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) in local mode.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use error::DatabaseError;
use libsql::Builder;

/// How long a writer waits for another connection's write lock.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Central database handle.
///
/// Wraps a libSQL database and a single connection. Provides ID generation;
/// repository methods live on [`service::AgencyService`].
pub struct AgencyDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl AgencyDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on every open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Wait for competing writers instead of failing with SQLITE_BUSY
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| DatabaseError::Migration(format!("busy_timeout: {e}")))?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let agency_db = Self { db, conn };
        agency_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(agency_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"tsk-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> AgencyDb {
        AgencyDb::open_local(":memory:").await.unwrap()
    }

    async fn seed_two_tasks(db: &AgencyDb) {
        for sql in [
            "INSERT INTO organizations (id, name) VALUES ('org-1', 'Studio')",
            "INSERT INTO projects (id, org_id, name) VALUES ('prj-1', 'org-1', 'Launch')",
            "INSERT INTO tasks (id, org_id, project_id, title) VALUES ('tsk-a', 'org-1', 'prj-1', 'A')",
            "INSERT INTO tasks (id, org_id, project_id, title) VALUES ('tsk-b', 'org-1', 'prj-1', 'B')",
        ] {
            db.conn().execute(sql, ()).await.unwrap();
        }
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "organizations",
            "users",
            "projects",
            "tasks",
            "task_dependencies",
            "expenses",
            "time_entries",
            "audit_trail",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("tsk").await.unwrap();
        assert!(id.starts_with("tsk-"), "ID should start with 'tsk-': {id}");
        assert_eq!(
            id.len(),
            12,
            "ID should be 12 chars (3 prefix + 1 dash + 8 hex): {id}"
        );

        let hex_part = &id[4..];
        assert!(
            hex_part.chars().all(|c| c.is_ascii_hexdigit()),
            "Random part should be hex: {hex_part}"
        );
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in agency_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn dependency_pair_is_unique() {
        let db = test_db().await;
        seed_two_tasks(&db).await;

        let insert = "INSERT INTO task_dependencies (dependent_id, depends_on_id, org_id, project_id) \
                      VALUES ('tsk-a', 'tsk-b', 'org-1', 'prj-1')";
        db.conn().execute(insert, ()).await.unwrap();
        let result = db.conn().execute(insert, ()).await;
        assert!(result.is_err(), "Duplicate dependency should be rejected");
    }

    #[tokio::test]
    async fn self_dependency_rejected_by_schema() {
        let db = test_db().await;
        seed_two_tasks(&db).await;

        let result = db
            .conn()
            .execute(
                "INSERT INTO task_dependencies (dependent_id, depends_on_id, org_id, project_id) \
                 VALUES ('tsk-a', 'tsk-a', 'org-1', 'prj-1')",
                (),
            )
            .await;
        assert!(result.is_err(), "Self edge should violate the CHECK constraint");
    }

    #[tokio::test]
    async fn deleting_task_cascades_edges() {
        let db = test_db().await;
        seed_two_tasks(&db).await;
        db.conn()
            .execute(
                "INSERT INTO task_dependencies (dependent_id, depends_on_id, org_id, project_id) \
                 VALUES ('tsk-a', 'tsk-b', 'org-1', 'prj-1')",
                (),
            )
            .await
            .unwrap();

        db.conn()
            .execute("DELETE FROM tasks WHERE id = 'tsk-b'", ())
            .await
            .unwrap();

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM task_dependencies", ())
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 0);
    }
}
