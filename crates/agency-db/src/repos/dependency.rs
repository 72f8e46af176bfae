//! Task dependency repository: guarded edge writes and graph queries.
//!
//! Adding an edge runs check-then-insert inside one `IMMEDIATE` transaction, so
//! the database write lock serializes concurrent writers and no two of them can
//! each pass the cycle check and together close a cycle.

use std::collections::HashMap;

use chrono::Utc;
use libsql::TransactionBehavior;

use agency_core::audit_detail::DependencyDetail;
use agency_core::entities::{Task, TaskDependency};
use agency_core::enums::{AuditAction, EntityType};
use agency_core::errors::CoreError;
use agency_core::graph::DependencyGraph;
use agency_core::identity::AuthContext;
use agency_core::responses::{BlockedTask, DependencyRemoved, TaskDependencies};

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::repos::audit::detail;
use crate::service::AgencyService;

const SELECT_COLS: &str = "dependent_id, depends_on_id, created_at";

fn row_to_dependency(row: &libsql::Row) -> Result<TaskDependency, DatabaseError> {
    Ok(TaskDependency {
        dependent_id: row.get(0)?,
        depends_on_id: row.get(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

impl AgencyService {
    /// Record that `dependent_id` depends on `depends_on_id`. Manager only.
    ///
    /// Both tasks must belong to the same project of the caller's organization.
    /// Re-adding an existing edge returns it unchanged.
    ///
    /// # Errors
    ///
    /// `Forbidden` for members, `SelfDependency` for a self edge (checked
    /// before storage is touched), `NotFound` for unknown tasks, a validation
    /// error for tasks of different projects, and `CircularDependency` when the
    /// edge would close a cycle. Nothing is written on error.
    pub async fn add_task_dependency(
        &self,
        ctx: &AuthContext,
        dependent_id: &str,
        depends_on_id: &str,
    ) -> Result<TaskDependency, DatabaseError> {
        ctx.require_manager("add task dependency")?;
        if dependent_id == depends_on_id {
            tracing::warn!(task_id = dependent_id, "rejected self dependency");
            return Err(CoreError::SelfDependency {
                task_id: dependent_id.to_string(),
            }
            .into());
        }

        let tx = self
            .db()
            .conn()
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;

        match self.insert_dependency(ctx, dependent_id, depends_on_id).await {
            Ok((edge, project_id, inserted)) => {
                tx.commit().await?;
                if inserted {
                    tracing::info!(dependent_id, depends_on_id, "task dependency added");
                    tracing::debug!(project_id = %project_id, "project views revalidated");
                }
                Ok(edge)
            }
            Err(error) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(%rollback, "rollback after rejected dependency failed");
                }
                Err(error)
            }
        }
    }

    /// Check and insert inside the caller's transaction.
    ///
    /// Returns the edge, its project, and whether a row was written.
    async fn insert_dependency(
        &self,
        ctx: &AuthContext,
        dependent_id: &str,
        depends_on_id: &str,
    ) -> Result<(TaskDependency, String, bool), DatabaseError> {
        let dependent = self.get_task(ctx, dependent_id).await?;
        let depends_on = self.get_task(ctx, depends_on_id).await?;
        if dependent.project_id != depends_on.project_id {
            tracing::warn!(dependent_id, depends_on_id, "rejected cross-project dependency");
            return Err(DatabaseError::validation(format!(
                "tasks {dependent_id} and {depends_on_id} belong to different projects"
            )));
        }
        let project_id = dependent.project_id;

        let edges = self.list_project_dependencies(ctx, &project_id).await?;
        if let Some(existing) = edges
            .iter()
            .find(|e| e.dependent_id == dependent_id && e.depends_on_id == depends_on_id)
        {
            return Ok((existing.clone(), project_id, false));
        }

        let graph = DependencyGraph::from_edges(&edges);
        if let Err(error) = graph.validate_new_edge(dependent_id, depends_on_id) {
            tracing::warn!(dependent_id, depends_on_id, "rejected circular dependency");
            return Err(error.into());
        }

        let now = Utc::now();
        self.db().conn().execute(
            "INSERT INTO task_dependencies (dependent_id, depends_on_id, org_id, project_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            libsql::params![
                dependent_id,
                depends_on_id,
                ctx.org_id.as_str(),
                project_id.as_str(),
                now.to_rfc3339()
            ],
        ).await?;

        let link = DependencyDetail {
            project_id: project_id.clone(),
            dependent_id: dependent_id.to_string(),
            depends_on_id: depends_on_id.to_string(),
        };
        self.audit(
            ctx,
            EntityType::TaskDependency,
            dependent_id,
            AuditAction::Linked,
            Some(detail(&link)?),
        )
        .await?;

        let edge = TaskDependency {
            dependent_id: dependent_id.to_string(),
            depends_on_id: depends_on_id.to_string(),
            created_at: now,
        };
        Ok((edge, project_id, true))
    }

    /// Remove the edge if present. Manager only. Removing a missing edge is not
    /// an error; only an actual removal is audited.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for members.
    pub async fn remove_task_dependency(
        &self,
        ctx: &AuthContext,
        dependent_id: &str,
        depends_on_id: &str,
    ) -> Result<DependencyRemoved, DatabaseError> {
        ctx.require_manager("remove task dependency")?;

        let mut rows = self.db().conn().query(
            "SELECT project_id FROM task_dependencies
             WHERE dependent_id = ?1 AND depends_on_id = ?2 AND org_id = ?3",
            libsql::params![dependent_id, depends_on_id, ctx.org_id.as_str()],
        ).await?;
        let project_id = match rows.next().await? {
            Some(row) => row.get::<String>(0)?,
            None => {
                return Ok(DependencyRemoved {
                    dependent_id: dependent_id.to_string(),
                    depends_on_id: depends_on_id.to_string(),
                    removed: false,
                });
            }
        };

        let removed = self.db().conn().execute(
            "DELETE FROM task_dependencies
             WHERE dependent_id = ?1 AND depends_on_id = ?2 AND org_id = ?3",
            libsql::params![dependent_id, depends_on_id, ctx.org_id.as_str()],
        ).await? > 0;

        if removed {
            let link = DependencyDetail {
                project_id: project_id.clone(),
                dependent_id: dependent_id.to_string(),
                depends_on_id: depends_on_id.to_string(),
            };
            self.audit(
                ctx,
                EntityType::TaskDependency,
                dependent_id,
                AuditAction::Unlinked,
                Some(detail(&link)?),
            )
            .await?;
            tracing::info!(dependent_id, depends_on_id, "task dependency removed");
            tracing::debug!(project_id = %project_id, "project views revalidated");
        }

        Ok(DependencyRemoved {
            dependent_id: dependent_id.to_string(),
            depends_on_id: depends_on_id.to_string(),
            removed,
        })
    }

    /// All edges of one project, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_project_dependencies(
        &self,
        ctx: &AuthContext,
        project_id: &str,
    ) -> Result<Vec<TaskDependency>, DatabaseError> {
        let mut rows = self.db().conn().query(
            &format!(
                "SELECT {SELECT_COLS} FROM task_dependencies
                 WHERE project_id = ?1 AND org_id = ?2 ORDER BY created_at, rowid"
            ),
            libsql::params![project_id, ctx.org_id.as_str()],
        ).await?;

        let mut edges = Vec::new();
        while let Some(row) = rows.next().await? {
            edges.push(row_to_dependency(&row)?);
        }
        Ok(edges)
    }

    /// Direct prerequisites and dependents of one task.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the task is not in the caller's org.
    pub async fn task_dependencies(
        &self,
        ctx: &AuthContext,
        task_id: &str,
    ) -> Result<TaskDependencies, DatabaseError> {
        self.get_task(ctx, task_id).await?;

        let mut rows = self.db().conn().query(
            &format!(
                "SELECT {SELECT_COLS} FROM task_dependencies
                 WHERE (dependent_id = ?1 OR depends_on_id = ?1) AND org_id = ?2
                 ORDER BY created_at, rowid"
            ),
            libsql::params![task_id, ctx.org_id.as_str()],
        ).await?;

        let mut depends_on = Vec::new();
        let mut dependents = Vec::new();
        while let Some(row) = rows.next().await? {
            let edge = row_to_dependency(&row)?;
            if edge.dependent_id == task_id {
                depends_on.push(edge);
            } else {
                dependents.push(edge);
            }
        }

        Ok(TaskDependencies {
            task_id: task_id.to_string(),
            depends_on,
            dependents,
        })
    }

    /// Tasks of a project with their dependency graph.
    async fn project_graph(
        &self,
        ctx: &AuthContext,
        project_id: &str,
    ) -> Result<(Vec<Task>, DependencyGraph), DatabaseError> {
        self.get_project(ctx, project_id).await?;
        let tasks = self.list_project_tasks(ctx, project_id).await?;
        let edges = self.list_project_dependencies(ctx, project_id).await?;
        tracing::debug!(project_id, tasks = tasks.len(), edges = edges.len(), "loaded project graph");
        Ok((tasks, DependencyGraph::from_edges(&edges)))
    }

    /// Project tasks ordered so every prerequisite precedes its dependents.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown project, or `CircularDependency` if
    /// the stored edges somehow form a cycle.
    pub async fn project_schedule(
        &self,
        ctx: &AuthContext,
        project_id: &str,
    ) -> Result<Vec<Task>, DatabaseError> {
        let (tasks, graph) = self.project_graph(ctx, project_id).await?;
        let order = graph.topological_order(tasks.iter().map(|t| t.id.as_str()))?;

        let mut by_id: HashMap<String, Task> =
            tasks.into_iter().map(|t| (t.id.clone(), t)).collect();
        Ok(order.into_iter().filter_map(|id| by_id.remove(&id)).collect())
    }

    /// Not-done tasks still waiting on not-done prerequisites.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown project.
    pub async fn blocked_tasks(
        &self,
        ctx: &AuthContext,
        project_id: &str,
    ) -> Result<Vec<BlockedTask>, DatabaseError> {
        let (tasks, graph) = self.project_graph(ctx, project_id).await?;
        Ok(graph
            .blocked_tasks(&tasks)
            .into_iter()
            .map(|(task, blocked_by)| BlockedTask {
                task: task.clone(),
                blocked_by,
            })
            .collect())
    }

    /// Not-done tasks whose prerequisites are all done.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown project.
    pub async fn ready_tasks(
        &self,
        ctx: &AuthContext,
        project_id: &str,
    ) -> Result<Vec<Task>, DatabaseError> {
        let (tasks, graph) = self.project_graph(ctx, project_id).await?;
        Ok(graph.ready_tasks(&tasks).into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{project, studio, task};
    use crate::updates::task::TaskUpdateBuilder;
    use agency_core::enums::TaskStatus;
    use pretty_assertions::assert_eq;

    async fn edge_pairs(s: &crate::test_support::helpers::Studio, prj: &str) -> Vec<(String, String)> {
        s.svc
            .list_project_dependencies(&s.manager, prj)
            .await
            .unwrap()
            .into_iter()
            .map(|e| (e.dependent_id, e.depends_on_id))
            .collect()
    }

    #[tokio::test]
    async fn reverse_edge_is_rejected() {
        let s = studio().await;
        let prj = project(&s.svc, &s.manager, "Launch").await;
        let a = task(&s.svc, &s.member, &prj, "A").await;
        let b = task(&s.svc, &s.member, &prj, "B").await;

        s.svc.add_task_dependency(&s.manager, &a, &b).await.unwrap();
        let result = s.svc.add_task_dependency(&s.manager, &b, &a).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::CircularDependency { .. }))
        ));
        assert_eq!(edge_pairs(&s, &prj).await, vec![(a, b)]);
    }

    #[tokio::test]
    async fn transitive_cycle_is_rejected() {
        let s = studio().await;
        let prj = project(&s.svc, &s.manager, "Launch").await;
        let a = task(&s.svc, &s.member, &prj, "A").await;
        let b = task(&s.svc, &s.member, &prj, "B").await;
        let c = task(&s.svc, &s.member, &prj, "C").await;

        s.svc.add_task_dependency(&s.manager, &a, &b).await.unwrap();
        s.svc.add_task_dependency(&s.manager, &b, &c).await.unwrap();
        let result = s.svc.add_task_dependency(&s.manager, &c, &a).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::CircularDependency { .. }))
        ));
        assert_eq!(edge_pairs(&s, &prj).await.len(), 2);
    }

    #[tokio::test]
    async fn self_dependency_is_rejected() {
        let s = studio().await;
        let prj = project(&s.svc, &s.manager, "Launch").await;
        let a = task(&s.svc, &s.member, &prj, "A").await;

        let result = s.svc.add_task_dependency(&s.manager, &a, &a).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::SelfDependency { .. }))
        ));
        assert!(edge_pairs(&s, &prj).await.is_empty());
    }

    #[tokio::test]
    async fn members_cannot_change_dependencies() {
        let s = studio().await;
        let prj = project(&s.svc, &s.manager, "Launch").await;
        let a = task(&s.svc, &s.member, &prj, "A").await;
        let b = task(&s.svc, &s.member, &prj, "B").await;

        let result = s.svc.add_task_dependency(&s.member, &a, &b).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::Forbidden { .. }))
        ));
        assert!(edge_pairs(&s, &prj).await.is_empty());

        s.svc.add_task_dependency(&s.manager, &a, &b).await.unwrap();
        let result = s.svc.remove_task_dependency(&s.member, &a, &b).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::Forbidden { .. }))
        ));
        assert_eq!(edge_pairs(&s, &prj).await.len(), 1);
    }

    #[tokio::test]
    async fn cross_project_edge_is_rejected() {
        let s = studio().await;
        let one = project(&s.svc, &s.manager, "One").await;
        let two = project(&s.svc, &s.manager, "Two").await;
        let a = task(&s.svc, &s.member, &one, "A").await;
        let b = task(&s.svc, &s.member, &two, "B").await;

        let result = s.svc.add_task_dependency(&s.manager, &a, &b).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn unknown_task_is_not_found() {
        let s = studio().await;
        let prj = project(&s.svc, &s.manager, "Launch").await;
        let a = task(&s.svc, &s.member, &prj, "A").await;

        let result = s.svc.add_task_dependency(&s.manager, &a, "tsk-00000000").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        // The transaction was rolled back: later writes still work.
        let b = task(&s.svc, &s.member, &prj, "B").await;
        s.svc.add_task_dependency(&s.manager, &a, &b).await.unwrap();
    }

    #[tokio::test]
    async fn re_adding_is_a_no_op() {
        let s = studio().await;
        let prj = project(&s.svc, &s.manager, "Launch").await;
        let a = task(&s.svc, &s.member, &prj, "A").await;
        let b = task(&s.svc, &s.member, &prj, "B").await;

        let first = s.svc.add_task_dependency(&s.manager, &a, &b).await.unwrap();
        let second = s.svc.add_task_dependency(&s.manager, &a, &b).await.unwrap();
        assert_eq!(first, second);

        let linked = s
            .svc
            .query_audit(
                &s.manager,
                &AuditFilter {
                    action: Some(AuditAction::Linked),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(linked.len(), 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent_and_audited_once() {
        let s = studio().await;
        let prj = project(&s.svc, &s.manager, "Launch").await;
        let a = task(&s.svc, &s.member, &prj, "A").await;
        let b = task(&s.svc, &s.member, &prj, "B").await;
        s.svc.add_task_dependency(&s.manager, &a, &b).await.unwrap();

        let first = s.svc.remove_task_dependency(&s.manager, &a, &b).await.unwrap();
        assert!(first.removed);
        let second = s.svc.remove_task_dependency(&s.manager, &a, &b).await.unwrap();
        assert!(!second.removed);
        assert!(edge_pairs(&s, &prj).await.is_empty());

        let unlinked = s
            .svc
            .query_audit(
                &s.manager,
                &AuditFilter {
                    action: Some(AuditAction::Unlinked),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(unlinked.len(), 1);

        // The reverse edge is allowed once the original is gone.
        s.svc.add_task_dependency(&s.manager, &b, &a).await.unwrap();
    }

    #[tokio::test]
    async fn task_dependencies_split_directions() {
        let s = studio().await;
        let prj = project(&s.svc, &s.manager, "Launch").await;
        let a = task(&s.svc, &s.member, &prj, "A").await;
        let b = task(&s.svc, &s.member, &prj, "B").await;
        let c = task(&s.svc, &s.member, &prj, "C").await;
        s.svc.add_task_dependency(&s.manager, &a, &b).await.unwrap();
        s.svc.add_task_dependency(&s.manager, &b, &c).await.unwrap();

        let deps = s.svc.task_dependencies(&s.member, &b).await.unwrap();
        assert_eq!(deps.depends_on.len(), 1);
        assert_eq!(deps.depends_on[0].depends_on_id, c);
        assert_eq!(deps.dependents.len(), 1);
        assert_eq!(deps.dependents[0].dependent_id, a);
    }

    #[tokio::test]
    async fn schedule_puts_prerequisites_first() {
        let s = studio().await;
        let prj = project(&s.svc, &s.manager, "Launch").await;
        let ship = task(&s.svc, &s.member, &prj, "Ship").await;
        let build = task(&s.svc, &s.member, &prj, "Build").await;
        let design = task(&s.svc, &s.member, &prj, "Design").await;
        s.svc.add_task_dependency(&s.manager, &ship, &build).await.unwrap();
        s.svc.add_task_dependency(&s.manager, &build, &design).await.unwrap();

        let order: Vec<String> = s
            .svc
            .project_schedule(&s.member, &prj)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(order, vec!["Design", "Build", "Ship"]);
    }

    #[tokio::test]
    async fn blocked_and_ready_follow_prerequisite_status() {
        let s = studio().await;
        let prj = project(&s.svc, &s.manager, "Launch").await;
        let a = task(&s.svc, &s.member, &prj, "A").await;
        let b = task(&s.svc, &s.member, &prj, "B").await;
        s.svc.add_task_dependency(&s.manager, &a, &b).await.unwrap();

        let blocked = s.svc.blocked_tasks(&s.member, &prj).await.unwrap();
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].task.id, a);
        assert_eq!(blocked[0].blocked_by, vec![b.clone()]);

        let ready: Vec<String> = s
            .svc
            .ready_tasks(&s.member, &prj)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ready, vec![b.clone()]);

        let done = TaskUpdateBuilder::new().status(TaskStatus::Done).build();
        s.svc.update_task(&s.member, &b, done).await.unwrap();

        assert!(s.svc.blocked_tasks(&s.member, &prj).await.unwrap().is_empty());
        let ready: Vec<String> = s
            .svc
            .ready_tasks(&s.member, &prj)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ready, vec![a]);
    }

    #[tokio::test]
    async fn deleting_a_task_drops_its_edges() {
        let s = studio().await;
        let prj = project(&s.svc, &s.manager, "Launch").await;
        let a = task(&s.svc, &s.member, &prj, "A").await;
        let b = task(&s.svc, &s.member, &prj, "B").await;
        s.svc.add_task_dependency(&s.manager, &a, &b).await.unwrap();

        s.svc.delete_task(&s.manager, &b).await.unwrap();
        assert!(edge_pairs(&s, &prj).await.is_empty());
    }
}
