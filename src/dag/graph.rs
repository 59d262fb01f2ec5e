// src/dag/graph.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::errors::{ReadyworkError, RejectReason, Result};
use crate::model::ids::{format_id, next_sequence, DEPENDENCY_ID_PREFIX};
use crate::model::{Dependency, DependencyId, DependencyType, TaskId};
use crate::store::TaskStore;

/// Internal node structure: ids of the edges leaving and entering a task.
#[derive(Debug, Clone, Default)]
struct Adjacency {
    /// Edges where this task is the dependent (it waits on the blocker).
    outgoing: Vec<DependencyId>,
    /// Edges where this task is the blocker.
    incoming: Vec<DependencyId>,
}

/// Directed, typed edges between tasks.
///
/// Edge direction follows the record: dependent → blocker. Adjacency is
/// kept in both directions so blocker lookups and "who waits on me"
/// lookups are both proportional to the task's degree.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    edges: HashMap<DependencyId, Dependency>,
    nodes: HashMap<TaskId, Adjacency>,
    next_seq: u64,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
            nodes: HashMap::new(),
            next_seq: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.edges.values()
    }

    pub fn get(&self, id: &str) -> Option<&Dependency> {
        self.edges.get(id)
    }

    /// Edges where `task` is the dependent.
    pub fn outgoing(&self, task: &str) -> impl Iterator<Item = &Dependency> {
        self.edge_list(self.nodes.get(task).map(|n| &n.outgoing))
    }

    /// Edges where `task` is the blocker.
    pub fn incoming(&self, task: &str) -> impl Iterator<Item = &Dependency> {
        self.edge_list(self.nodes.get(task).map(|n| &n.incoming))
    }

    /// Every edge touching `task`, in either direction, oldest first.
    pub fn edges_touching(&self, task: &str) -> Vec<Dependency> {
        let mut edges: Vec<Dependency> = self
            .outgoing(task)
            .chain(self.incoming(task).filter(|d| d.dependent_id != task))
            .cloned()
            .collect();
        edges.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        edges
    }

    /// Validate a prospective edge against the store and existing edges.
    pub fn check_new_edge(
        &self,
        store: &TaskStore,
        dependent: &str,
        blocker: &str,
        dependency_type: DependencyType,
    ) -> std::result::Result<(), RejectReason> {
        if !store.contains(dependent) {
            return Err(RejectReason::UnknownDependent);
        }
        if !store.contains(blocker) {
            return Err(RejectReason::UnknownBlocker);
        }
        if dependent == blocker {
            return Err(RejectReason::SelfLoop);
        }
        if self
            .outgoing(dependent)
            .any(|d| d.blocker_id == blocker && d.dependency_type == dependency_type)
        {
            return Err(RejectReason::Duplicate);
        }
        Ok(())
    }

    pub fn add(
        &mut self,
        store: &TaskStore,
        dependent: &str,
        blocker: &str,
        dependency_type: DependencyType,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Dependency> {
        if let Err(reason) = self.check_new_edge(store, dependent, blocker, dependency_type) {
            warn!(
                dependent = %dependent,
                blocker = %blocker,
                %reason,
                "rejecting dependency"
            );
            return Err(ReadyworkError::Rejected(reason));
        }

        let id = format_id(DEPENDENCY_ID_PREFIX, self.next_seq);
        self.next_seq += 1;

        let dep = Dependency {
            id: id.clone(),
            dependent_id: dependent.to_string(),
            blocker_id: blocker.to_string(),
            dependency_type,
            note,
            created_at: now,
        };

        self.link(&dep);
        self.edges.insert(id, dep.clone());

        info!(
            dependency = %dep.id,
            dependent = %dependent,
            blocker = %blocker,
            dependency_type = %dependency_type,
            "added dependency"
        );
        Ok(dep)
    }

    /// Remove every edge from `dependent` to `blocker`, whatever its type.
    ///
    /// Returns the removed edges.
    pub fn remove(&mut self, dependent: &str, blocker: &str) -> Vec<Dependency> {
        let ids: Vec<DependencyId> = self
            .outgoing(dependent)
            .filter(|d| d.connects(dependent, blocker))
            .map(|d| d.id.clone())
            .collect();

        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(dep) = self.edges.remove(&id) {
                self.unlink(&dep);
                removed.push(dep);
            }
        }

        if removed.is_empty() {
            debug!(dependent = %dependent, blocker = %blocker, "no dependency to remove");
        } else {
            info!(
                dependent = %dependent,
                blocker = %blocker,
                count = removed.len(),
                "removed dependencies"
            );
        }
        removed
    }

    /// Insert or overwrite edges wholesale, rebuild adjacency and re-derive
    /// the id counter. Callers validate endpoints beforehand.
    pub fn upsert_all(&mut self, edges: impl IntoIterator<Item = Dependency>) {
        for dep in edges {
            self.edges.insert(dep.id.clone(), dep);
        }

        self.nodes.clear();
        let all: Vec<Dependency> = self.edges.values().cloned().collect();
        for dep in &all {
            self.link(dep);
        }

        self.next_seq = next_sequence(
            DEPENDENCY_ID_PREFIX,
            self.edges.keys().map(String::as_str),
        );
        debug!(next_seq = self.next_seq, "recomputed dependency sequence counter");
    }

    fn edge_list<'a>(
        &'a self,
        ids: Option<&'a Vec<DependencyId>>,
    ) -> impl Iterator<Item = &'a Dependency> + 'a {
        let ids: &[DependencyId] = ids.map(Vec::as_slice).unwrap_or(&[]);
        ids.iter().filter_map(|id| self.edges.get(id))
    }

    fn link(&mut self, dep: &Dependency) {
        self.nodes
            .entry(dep.dependent_id.clone())
            .or_default()
            .outgoing
            .push(dep.id.clone());
        self.nodes
            .entry(dep.blocker_id.clone())
            .or_default()
            .incoming
            .push(dep.id.clone());
    }

    fn unlink(&mut self, dep: &Dependency) {
        if let Some(node) = self.nodes.get_mut(&dep.dependent_id) {
            node.outgoing.retain(|id| id != &dep.id);
        }
        if let Some(node) = self.nodes.get_mut(&dep.blocker_id) {
            node.incoming.retain(|id| id != &dep.id);
        }
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Origin, TaskSpec};

    fn store_with(n: usize) -> TaskStore {
        let mut store = TaskStore::default();
        for i in 0..n {
            store
                .create(TaskSpec::new(format!("t{i}")), &Origin::default(), Utc::now())
                .unwrap();
        }
        store
    }

    #[test]
    fn rejects_unknown_endpoints_self_loops_and_duplicates() {
        let store = store_with(2);
        let mut graph = DependencyGraph::new();
        let now = Utc::now();

        let unknown = graph.add(&store, "task-1", "nope", DependencyType::Blocks, None, now);
        assert!(matches!(
            unknown,
            Err(ReadyworkError::Rejected(RejectReason::UnknownBlocker))
        ));
        let unknown_dep = graph.add(&store, "X", "task-1", DependencyType::Blocks, None, now);
        assert!(matches!(
            unknown_dep,
            Err(ReadyworkError::Rejected(RejectReason::UnknownDependent))
        ));
        let self_loop = graph.add(&store, "task-1", "task-1", DependencyType::Blocks, None, now);
        assert!(matches!(
            self_loop,
            Err(ReadyworkError::Rejected(RejectReason::SelfLoop))
        ));

        graph
            .add(&store, "task-2", "task-1", DependencyType::Blocks, None, now)
            .unwrap();
        let dup = graph.add(&store, "task-2", "task-1", DependencyType::Blocks, None, now);
        assert!(matches!(
            dup,
            Err(ReadyworkError::Rejected(RejectReason::Duplicate))
        ));
        // Same pair, different type is fine.
        graph
            .add(&store, "task-2", "task-1", DependencyType::Related, None, now)
            .unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn remove_drops_every_edge_between_the_pair() {
        let store = store_with(3);
        let mut graph = DependencyGraph::new();
        let now = Utc::now();
        graph.add(&store, "task-2", "task-1", DependencyType::Blocks, None, now).unwrap();
        graph.add(&store, "task-2", "task-1", DependencyType::Related, None, now).unwrap();
        graph.add(&store, "task-3", "task-1", DependencyType::Blocks, None, now).unwrap();

        let removed = graph.remove("task-2", "task-1");
        assert_eq!(removed.len(), 2);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.outgoing("task-2").count(), 0);
        assert_eq!(graph.incoming("task-1").count(), 1);
        assert!(graph.remove("task-2", "task-1").is_empty());
    }

    #[test]
    fn upsert_rebuilds_adjacency_and_counter() {
        let store = store_with(2);
        let mut source = DependencyGraph::new();
        let dep = source
            .add(&store, "task-2", "task-1", DependencyType::Blocks, None, Utc::now())
            .unwrap();

        let mut renamed = dep.clone();
        renamed.id = "dep-17".into();

        let mut graph = DependencyGraph::new();
        graph.upsert_all(vec![renamed]);
        assert_eq!(graph.outgoing("task-2").count(), 1);
        assert_eq!(graph.incoming("task-1").count(), 1);

        let next = graph
            .add(&store, "task-1", "task-2", DependencyType::Related, None, Utc::now())
            .unwrap();
        assert_eq!(next.id, "dep-18");
    }

    #[test]
    fn edges_touching_lists_both_directions() {
        let store = store_with(3);
        let mut graph = DependencyGraph::new();
        let now = Utc::now();
        graph.add(&store, "task-2", "task-1", DependencyType::Blocks, None, now).unwrap();
        graph.add(&store, "task-3", "task-2", DependencyType::Blocks, None, now).unwrap();

        let touching = graph.edges_touching("task-2");
        assert_eq!(touching.len(), 2);
        assert!(touching.iter().all(|d| d.touches("task-2")));
    }
}
