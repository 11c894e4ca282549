// src/dag/graph.rs

use std::collections::{BTreeMap, HashMap};

use crate::dag::task::Task;
use crate::dag::validate::validate_precedence;
use crate::errors::Result;
use crate::types::TaskName;

/// Caller-supplied precedence mapping: task name -> names that must finish
/// immediately before it.
pub type Precedence = BTreeMap<TaskName, Vec<TaskName>>;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone, Default)]
struct DagNode {
    /// Direct predecessors: tasks that must complete before this one starts.
    deps: Vec<TaskName>,
    /// Direct successors: tasks that list this one as a predecessor.
    dependents: Vec<TaskName>,
}

/// Validated precedence graph keyed by task name.
///
/// Only [`PrecedenceGraph::build`] creates one, so every instance is known to
/// cover exactly the registered tasks, with no self-loops and no cycles.
#[derive(Debug, Clone)]
pub struct PrecedenceGraph {
    /// Task names in registration order.
    order: Vec<TaskName>,
    nodes: HashMap<TaskName, DagNode>,
}

impl PrecedenceGraph {
    /// Validate `tasks` against `precedence` and build the graph.
    ///
    /// Repeated predecessor names within one entry are collapsed, keeping the
    /// first occurrence.
    pub fn build<S>(tasks: &[Task<S>], precedence: &Precedence) -> Result<Self> {
        let names: Vec<&str> = tasks.iter().map(Task::name).collect();
        validate_precedence(&names, precedence)?;

        let mut nodes: HashMap<TaskName, DagNode> = names
            .iter()
            .map(|name| (name.to_string(), DagNode::default()))
            .collect();

        // First pass: predecessor lists, in mapping order, without repeats.
        for &name in &names {
            let mut deps: Vec<TaskName> = Vec::new();
            for pred in &precedence[name] {
                if !deps.contains(pred) {
                    deps.push(pred.clone());
                }
            }
            if let Some(node) = nodes.get_mut(name) {
                node.deps = deps;
            }
        }

        // Second pass: populate dependents based on deps, in registration order.
        for &name in &names {
            let deps = nodes
                .get(name)
                .map(|n| n.deps.clone())
                .unwrap_or_default();

            for dep in deps {
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(name.to_string());
                }
            }
        }

        Ok(Self {
            order: names.iter().map(|s| s.to_string()).collect(),
            nodes,
        })
    }

    /// All task names, in registration order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Immediate predecessors of a task.
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate successors of a task.
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// The graph as a precedence mapping again (for display by callers).
    pub fn to_precedence(&self) -> Precedence {
        self.tasks()
            .map(|name| (name.to_string(), self.dependencies_of(name).to_vec()))
            .collect()
    }
}
