// src/dag/cycles.rs

//! Deadlock detection over `Blocks` edges.
//!
//! Cycles are not rejected when edges are added, so a set of tasks can end
//! up waiting on each other forever. This module finds those sets.

use petgraph::algo::{has_path_connecting, tarjan_scc};
use petgraph::graphmap::DiGraphMap;

use crate::dag::DependencyGraph;
use crate::model::TaskId;
use crate::store::TaskStore;

/// Build the live blocking graph: nodes are unfinished tasks, and there is
/// an edge dependent → blocker for every `Blocks` dependency between two
/// unfinished tasks.
fn blocking_graph<'a>(store: &'a TaskStore, graph: &'a DependencyGraph) -> DiGraphMap<&'a str, ()> {
    let mut g: DiGraphMap<&str, ()> = DiGraphMap::new();

    for dep in graph.iter() {
        if !dep.dependency_type.affects_readiness() {
            continue;
        }
        let live = |id: &str| {
            store
                .status_of(id)
                .is_some_and(|s| !s.releases_dependents())
        };
        if live(&dep.dependent_id) && live(&dep.blocker_id) {
            g.add_edge(dep.dependent_id.as_str(), dep.blocker_id.as_str(), ());
        }
    }

    g
}

/// Groups of tasks that block each other in a cycle.
///
/// Each group is sorted by id sequence; groups are ordered by their first
/// member. Singletons are never reported since self-loops are rejected.
pub fn blocking_cycles(store: &TaskStore, graph: &DependencyGraph) -> Vec<Vec<TaskId>> {
    let g = blocking_graph(store, graph);
    let order = |id: &TaskId| (store.sequence_of(id), id.clone());

    let mut cycles: Vec<Vec<TaskId>> = tarjan_scc(&g)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut ids: Vec<TaskId> = component.into_iter().map(str::to_string).collect();
            ids.sort_by_key(order);
            ids
        })
        .collect();

    cycles.sort_by_key(|c| c.first().map(order));
    cycles
}

/// Whether adding the edge `dependent → blocker` would close a blocking
/// cycle, i.e. `blocker` already (transitively) waits on `dependent`.
pub fn would_close_cycle(
    store: &TaskStore,
    graph: &DependencyGraph,
    dependent: &str,
    blocker: &str,
) -> bool {
    let g = blocking_graph(store, graph);
    if !g.contains_node(blocker) || !g.contains_node(dependent) {
        return false;
    }
    has_path_connecting(&g, blocker, dependent, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DependencyType, Origin, TaskSpec, TaskStatus, TaskUpdate};
    use chrono::Utc;

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
    fn finds_two_task_cycle() {
        let store = store_with(3);
        let mut graph = DependencyGraph::new();
        let now = Utc::now();
        graph.add(&store, "task-1", "task-2", DependencyType::Blocks, None, now).unwrap();
        graph.add(&store, "task-2", "task-1", DependencyType::Blocks, None, now).unwrap();
        graph.add(&store, "task-3", "task-1", DependencyType::Blocks, None, now).unwrap();

        let cycles = blocking_cycles(&store, &graph);
        assert_eq!(cycles, vec![vec!["task-1".to_string(), "task-2".to_string()]]);
    }

    #[test]
    fn informational_edges_and_completed_tasks_break_cycles() {
        let mut store = store_with(3);
        let mut graph = DependencyGraph::new();
        let now = Utc::now();
        graph.add(&store, "task-1", "task-2", DependencyType::Blocks, None, now).unwrap();
        graph.add(&store, "task-2", "task-1", DependencyType::Related, None, now).unwrap();
        assert!(blocking_cycles(&store, &graph).is_empty());

        graph.add(&store, "task-2", "task-3", DependencyType::Blocks, None, now).unwrap();
        graph.add(&store, "task-3", "task-1", DependencyType::Blocks, None, now).unwrap();
        assert_eq!(blocking_cycles(&store, &graph).len(), 1);

        store
            .update("task-3", TaskUpdate::status(TaskStatus::Completed), now)
            .unwrap();
        assert!(blocking_cycles(&store, &graph).is_empty());
    }

    #[test]
    fn detects_edge_that_would_close_cycle() {
        let store = store_with(3);
        let mut graph = DependencyGraph::new();
        let now = Utc::now();
        graph.add(&store, "task-2", "task-1", DependencyType::Blocks, None, now).unwrap();
        graph.add(&store, "task-3", "task-2", DependencyType::Blocks, None, now).unwrap();

        assert!(would_close_cycle(&store, &graph, "task-1", "task-3"));
        assert!(!would_close_cycle(&store, &graph, "task-3", "task-1"));
    }
}
