//! Task dependency graph: cycle prevention and scheduling queries.
//!
//! Edges point from a dependent task to the task it depends on. The graph is
//! built from already-stored edges; it never touches storage itself.

use std::collections::{HashMap, HashSet, VecDeque};

use rustworkx_core::petgraph::algo::toposort;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};

use crate::entities::{Task, TaskDependency};
use crate::errors::CoreError;

/// In-memory adjacency view over a set of dependency edges.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// dependent -> tasks it depends on
    depends_on: HashMap<String, Vec<String>>,
    /// depended-on -> tasks depending on it
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(dependent_id, depends_on_id)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for (dependent, depends_on) in pairs {
            graph.insert(dependent.into(), depends_on.into());
        }
        graph
    }

    #[must_use]
    pub fn from_edges(edges: &[TaskDependency]) -> Self {
        Self::from_pairs(
            edges
                .iter()
                .map(|e| (e.dependent_id.as_str(), e.depends_on_id.as_str())),
        )
    }

    /// Record an edge without validation. Duplicate edges are ignored.
    pub fn insert(&mut self, dependent: String, depends_on: String) {
        let forward = self.depends_on.entry(dependent.clone()).or_default();
        if forward.contains(&depends_on) {
            return;
        }
        forward.push(depends_on.clone());
        self.dependents.entry(depends_on).or_default().push(dependent);
    }

    /// Remove an edge if present. Returns whether anything was removed.
    pub fn remove(&mut self, dependent: &str, depends_on: &str) -> bool {
        let removed = self
            .depends_on
            .get_mut(dependent)
            .map(|targets| {
                let before = targets.len();
                targets.retain(|t| t != depends_on);
                before != targets.len()
            })
            .unwrap_or(false);
        if removed && let Some(sources) = self.dependents.get_mut(depends_on) {
            sources.retain(|s| s != dependent);
        }
        removed
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.depends_on.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn contains_edge(&self, dependent: &str, depends_on: &str) -> bool {
        self.depends_on
            .get(dependent)
            .is_some_and(|targets| targets.iter().any(|t| t == depends_on))
    }

    /// Tasks that `task_id` directly depends on.
    #[must_use]
    pub fn dependencies_of(&self, task_id: &str) -> &[String] {
        self.depends_on.get(task_id).map_or(&[], Vec::as_slice)
    }

    /// Tasks that directly depend on `task_id`.
    #[must_use]
    pub fn dependents_of(&self, task_id: &str) -> &[String] {
        self.dependents.get(task_id).map_or(&[], Vec::as_slice)
    }

    /// Whether adding `dependent_id -> candidate_depends_on_id` would close a cycle.
    ///
    /// Breadth-first walk from the candidate along "depends on" edges; reaching
    /// `dependent_id` means the candidate already (transitively) depends on it.
    /// A self edge is trivially a cycle and returns `true` without traversal.
    #[must_use]
    pub fn would_create_cycle(&self, dependent_id: &str, candidate_depends_on_id: &str) -> bool {
        if dependent_id == candidate_depends_on_id {
            return true;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(candidate_depends_on_id);

        while let Some(current) = queue.pop_front() {
            if current == dependent_id {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            for next in self.dependencies_of(current) {
                if !visited.contains(next.as_str()) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Reject self edges, then edges that would create a cycle.
    ///
    /// # Errors
    ///
    /// `CoreError::SelfDependency` when both IDs are equal (checked before any
    /// traversal), `CoreError::CircularDependency` when the edge closes a cycle.
    pub fn validate_new_edge(&self, dependent_id: &str, depends_on_id: &str) -> Result<(), CoreError> {
        if dependent_id == depends_on_id {
            return Err(CoreError::SelfDependency {
                task_id: dependent_id.to_string(),
            });
        }
        if self.would_create_cycle(dependent_id, depends_on_id) {
            return Err(CoreError::CircularDependency {
                dependent_id: dependent_id.to_string(),
                depends_on_id: depends_on_id.to_string(),
            });
        }
        Ok(())
    }

    /// Order `task_ids` so that every task comes after everything it depends on.
    ///
    /// Tasks mentioned only by edges are included too.
    ///
    /// # Errors
    ///
    /// `CoreError::CircularDependency` if the stored edges contain a cycle.
    pub fn topological_order<'a, I>(&self, task_ids: I) -> Result<Vec<String>, CoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut index: HashMap<String, NodeIndex> = HashMap::new();

        let mut node = |graph: &mut DiGraph<String, ()>, id: &str| -> NodeIndex {
            *index
                .entry(id.to_string())
                .or_insert_with(|| graph.add_node(id.to_string()))
        };

        for id in task_ids {
            node(&mut graph, id);
        }

        let mut dependents: Vec<&String> = self.depends_on.keys().collect();
        dependents.sort();
        for dependent in dependents {
            let to = node(&mut graph, dependent);
            for prerequisite in &self.depends_on[dependent] {
                let from = node(&mut graph, prerequisite);
                graph.add_edge(from, to, ());
            }
        }

        let order = toposort(&graph, None).map_err(|cycle| {
            let id = graph[cycle.node_id()].clone();
            CoreError::CircularDependency {
                dependent_id: id.clone(),
                depends_on_id: id,
            }
        })?;

        Ok(order.into_iter().map(|ix| graph[ix].clone()).collect())
    }

    /// Prerequisites of `task_id` that are not yet done.
    ///
    /// Prerequisites absent from `tasks` are ignored.
    #[must_use]
    pub fn open_prerequisites(&self, task_id: &str, tasks: &[Task]) -> Vec<String> {
        let by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
        self.dependencies_of(task_id)
            .iter()
            .filter(|dep| by_id.get(dep.as_str()).is_some_and(|t| !t.status.is_done()))
            .cloned()
            .collect()
    }

    /// Not-done tasks with at least one not-done prerequisite, paired with the
    /// IDs of those prerequisites.
    #[must_use]
    pub fn blocked_tasks<'t>(&self, tasks: &'t [Task]) -> Vec<(&'t Task, Vec<String>)> {
        tasks
            .iter()
            .filter(|t| !t.status.is_done())
            .filter_map(|t| {
                let open = self.open_prerequisites(&t.id, tasks);
                (!open.is_empty()).then_some((t, open))
            })
            .collect()
    }

    /// Not-done tasks whose prerequisites are all done.
    #[must_use]
    pub fn ready_tasks<'t>(&self, tasks: &'t [Task]) -> Vec<&'t Task> {
        tasks
            .iter()
            .filter(|t| !t.status.is_done())
            .filter(|t| self.open_prerequisites(&t.id, tasks).is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{TaskPriority, TaskStatus};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn chain() -> DependencyGraph {
        // a depends on b, b depends on c
        DependencyGraph::from_pairs([("a", "b"), ("b", "c")])
    }

    fn task(id: &str, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id: id.into(),
            org_id: "org-1".into(),
            project_id: "prj-1".into(),
            title: id.to_uppercase(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            start_date: None,
            due_date: None,
            estimated_hours: None,
            actual_hours: None,
            assignee_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case("c", "a", true)] // c -> a closes a -> b -> c
    #[case("b", "a", true)]
    #[case("c", "b", true)]
    #[case("a", "c", false)] // already implied, no cycle
    #[case("d", "a", false)] // new node
    #[case("a", "d", false)]
    fn would_create_cycle_cases(#[case] dependent: &str, #[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(chain().would_create_cycle(dependent, candidate), expected);
    }

    #[test]
    fn self_edge_is_rejected_before_traversal() {
        let graph = DependencyGraph::new();
        assert!(graph.would_create_cycle("a", "a"));
        assert!(matches!(
            graph.validate_new_edge("a", "a"),
            Err(CoreError::SelfDependency { task_id }) if task_id == "a"
        ));
    }

    #[test]
    fn validate_new_edge_reports_cycle() {
        let err = chain().validate_new_edge("c", "a").unwrap_err();
        assert!(matches!(err, CoreError::CircularDependency { .. }));
    }

    #[test]
    fn acyclic_additions_keep_graph_acyclic() {
        let mut graph = DependencyGraph::new();
        let candidates = [
            ("t2", "t1"),
            ("t3", "t1"),
            ("t4", "t2"),
            ("t4", "t3"),
            ("t1", "t4"), // would close t1 <- t2 <- t4 <- t1
            ("t5", "t4"),
            ("t3", "t5"), // t5 -> t4 -> t3
        ];
        let mut accepted = 0;
        for (dependent, depends_on) in candidates {
            if graph.validate_new_edge(dependent, depends_on).is_ok() {
                graph.insert(dependent.into(), depends_on.into());
                accepted += 1;
            }
        }
        assert_eq!(accepted, 5);
        assert!(graph.topological_order(["t1", "t2", "t3", "t4", "t5"]).is_ok());
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let graph = DependencyGraph::from_pairs([("d", "b"), ("d", "c"), ("b", "a"), ("c", "a")]);
        assert!(!graph.would_create_cycle("d", "a"));
        assert!(graph.would_create_cycle("a", "d"));
    }

    #[test]
    fn remove_missing_edge_is_noop() {
        let mut graph = chain();
        assert!(!graph.remove("c", "a"));
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.remove("a", "b"));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.dependents_of("b").is_empty());
    }

    #[test]
    fn duplicate_edges_are_collapsed() {
        let graph = DependencyGraph::from_pairs([("a", "b"), ("a", "b")]);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge("a", "b"));
    }

    #[test]
    fn topological_order_puts_prerequisites_first() {
        let graph = DependencyGraph::from_pairs([("a", "b"), ("b", "c"), ("d", "c")]);
        let order = graph.topological_order(["a", "b", "c", "d", "e"]).unwrap();
        assert_eq!(order.len(), 5);
        let pos = |id: &str| order.iter().position(|x| x == id).unwrap();
        assert!(pos("c") < pos("b"));
        assert!(pos("b") < pos("a"));
        assert!(pos("c") < pos("d"));
    }

    #[test]
    fn topological_order_detects_stored_cycle() {
        let mut graph = chain();
        graph.insert("c".into(), "a".into());
        assert!(matches!(
            graph.topological_order(std::iter::empty()),
            Err(CoreError::CircularDependency { .. })
        ));
    }

    #[test]
    fn ready_and_blocked_follow_prerequisite_status() {
        let graph = chain();
        let tasks = vec![
            task("a", TaskStatus::ToDo),
            task("b", TaskStatus::InProgress),
            task("c", TaskStatus::Done),
        ];

        let ready: Vec<&str> = graph.ready_tasks(&tasks).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ready, vec!["b"]);

        let blocked = graph.blocked_tasks(&tasks);
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].0.id, "a");
        assert_eq!(blocked[0].1, vec!["b".to_string()]);
    }
}
