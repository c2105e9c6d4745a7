//! Dependency-first ordering of extracted tasks.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::task::{push_unique, TaskSpec};

/// A dependency edge ignored because following it would close a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedEdge {
    /// Title of the task declaring the dependency.
    pub task: String,
    /// Title it depends on.
    pub dependency: String,
}

/// Tasks reordered so that prerequisites come first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyOrder {
    /// Every input task exactly once.
    pub order: Vec<TaskSpec>,
    /// Edges broken to make the order possible.
    pub dropped_edges: Vec<DroppedEdge>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    New,
    OnStack,
    Done,
}

/// Orders `tasks` depth-first so each task follows the batch tasks it
/// depends on, and fills in each task's `blocks` with the titles of the
/// batch tasks depending on it.
///
/// Dependencies naming a title outside the batch are ignored. Duplicate
/// titles resolve to their first occurrence. An edge back to a task still
/// on the DFS stack is dropped and reported, and does not count as a block.
#[must_use]
pub fn order_by_dependencies(mut tasks: Vec<TaskSpec>) -> DependencyOrder {
    let (sequence, dropped_edges, blocked_by) = {
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, task) in tasks.iter().enumerate() {
            index.entry(task.title.as_str()).or_insert(i);
        }

        let mut walk = Walk {
            tasks: &tasks,
            index: &index,
            marks: vec![Mark::New; tasks.len()],
            sequence: Vec::with_capacity(tasks.len()),
            dropped_edges: Vec::new(),
        };
        for i in 0..tasks.len() {
            walk.visit(i);
        }
        let Walk { sequence, dropped_edges, .. } = walk;

        let blocked_by: Vec<(usize, String)> = tasks
            .iter()
            .flat_map(|task| {
                task.dependencies.iter().filter_map(|dependency| {
                    let &target = index.get(dependency.as_str())?;
                    let dropped = dropped_edges
                        .iter()
                        .any(|e| e.task == task.title && e.dependency == *dependency);
                    (!dropped).then(|| (target, task.title.clone()))
                })
            })
            .collect();
        (sequence, dropped_edges, blocked_by)
    };

    for (target, title) in blocked_by {
        push_unique(&mut tasks[target].blocks, title);
    }

    let mut slots: Vec<Option<TaskSpec>> = tasks.into_iter().map(Some).collect();
    let order = sequence.into_iter().filter_map(|i| slots[i].take()).collect();
    DependencyOrder { order, dropped_edges }
}

struct Walk<'t> {
    tasks: &'t [TaskSpec],
    index: &'t HashMap<&'t str, usize>,
    marks: Vec<Mark>,
    sequence: Vec<usize>,
    dropped_edges: Vec<DroppedEdge>,
}

impl Walk<'_> {
    fn visit(&mut self, i: usize) {
        if self.marks[i] != Mark::New {
            return;
        }
        self.marks[i] = Mark::OnStack;

        let (tasks, index) = (self.tasks, self.index);
        let task = &tasks[i];
        for dependency in &task.dependencies {
            let Some(&dep) = index.get(dependency.as_str()) else {
                continue;
            };
            match self.marks[dep] {
                Mark::New => self.visit(dep),
                Mark::OnStack => {
                    warn!(task = %task.title, dependency = %dependency, "dropping cyclic dependency");
                    self.dropped_edges.push(DroppedEdge {
                        task: task.title.clone(),
                        dependency: dependency.clone(),
                    });
                }
                Mark::Done => {}
            }
        }

        self.marks[i] = Mark::Done;
        self.sequence.push(i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, deps: &[&str]) -> TaskSpec {
        let mut t = TaskSpec::new(title, title);
        t.dependencies = deps.iter().map(|d| (*d).to_string()).collect();
        t
    }

    fn titles(order: &DependencyOrder) -> Vec<&str> {
        order.order.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn chain_is_ordered_regardless_of_input_order() {
        let result = order_by_dependencies(vec![task("C", &["B"]), task("A", &[]), task("B", &["A"])]);
        assert_eq!(titles(&result), vec!["A", "B", "C"]);
        assert!(result.dropped_edges.is_empty());
    }

    #[test]
    fn independent_tasks_keep_input_order() {
        let result = order_by_dependencies(vec![task("X", &[]), task("Y", &[]), task("Z", &[])]);
        assert_eq!(titles(&result), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn cycle_drops_exactly_one_edge() {
        let result = order_by_dependencies(vec![task("A", &["B"]), task("B", &["A"])]);
        assert_eq!(titles(&result), vec!["B", "A"]);
        assert_eq!(
            result.dropped_edges,
            vec![DroppedEdge { task: "B".into(), dependency: "A".into() }]
        );
    }

    #[test]
    fn blocks_are_the_inverse_of_kept_dependencies() {
        let result = order_by_dependencies(vec![
            task("Login button", &["Register OAuth app"]),
            task("Session store", &["Register OAuth app"]),
            task("Register OAuth app", &[]),
        ]);
        let app = &result.order[0];
        assert_eq!(app.title, "Register OAuth app");
        assert_eq!(app.blocks, vec!["Login button", "Session store"]);
        assert!(result.order[1].blocks.is_empty());
    }

    #[test]
    fn dropped_cycle_edge_is_not_a_block() {
        let result = order_by_dependencies(vec![task("A", &["B"]), task("B", &["A"])]);
        let a = result.order.iter().find(|t| t.title == "A").unwrap();
        let b = result.order.iter().find(|t| t.title == "B").unwrap();
        assert_eq!(b.blocks, vec!["A"]);
        assert!(a.blocks.is_empty());
    }

    #[test]
    fn unknown_dependencies_are_ignored() {
        let result = order_by_dependencies(vec![task("A", &["Somewhere else"])]);
        assert_eq!(titles(&result), vec!["A"]);
        assert!(result.dropped_edges.is_empty());
    }

    #[test]
    fn duplicate_titles_are_all_kept() {
        let result = order_by_dependencies(vec![task("A", &[]), task("B", &["A"]), task("A", &[])]);
        assert_eq!(result.order.len(), 3);
        assert_eq!(titles(&result), vec!["A", "B", "A"]);
    }

    #[test]
    fn empty_batch() {
        let result = order_by_dependencies(Vec::new());
        assert!(result.order.is_empty());
    }
}
