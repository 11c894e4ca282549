// src/dag/resolver.rs

//! Transitive dependency resolution over a [`PrecedenceGraph`].

use std::collections::{HashMap, HashSet};

use crate::dag::graph::PrecedenceGraph;
use crate::errors::{MaxparError, Result};
use crate::types::TaskName;

/// Computes full dependency sets and dependency-consistent orders.
#[derive(Debug, Clone, Copy)]
pub struct DependencyResolver<'g> {
    graph: &'g PrecedenceGraph,
}

struct Frame<'g> {
    name: &'g str,
    next: usize,
}

impl<'g> DependencyResolver<'g> {
    pub fn new(graph: &'g PrecedenceGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g PrecedenceGraph {
        self.graph
    }

    /// Every task that must finish before `name`, transitively.
    ///
    /// The result never contains `name` and no entry is a (transitive)
    /// dependent of an entry after it. Ancestors shared by several
    /// predecessors appear once, at the point they were first fully resolved.
    pub fn dependencies_of(&self, name: &str) -> Result<Vec<TaskName>> {
        let root = self
            .graph
            .tasks()
            .find(|t| *t == name)
            .ok_or_else(|| MaxparError::UnknownTask(name.to_string()))?;

        let mut order = self.expand(root);
        // Expansion always finishes with the root itself.
        order.pop();
        Ok(order)
    }

    /// Post-order expansion of `root`'s predecessors, `root` included last.
    fn expand(&self, root: &'g str) -> Vec<TaskName> {
        let mut order: Vec<TaskName> = Vec::new();
        let mut resolved: HashSet<&'g str> = HashSet::new();
        let mut stack = vec![Frame { name: root, next: 0 }];

        while let Some(frame) = stack.last_mut() {
            let preds = self.graph.dependencies_of(frame.name);

            if let Some(pred) = preds.get(frame.next) {
                frame.next += 1;
                if !resolved.contains(pred.as_str()) {
                    stack.push(Frame {
                        name: pred.as_str(),
                        next: 0,
                    });
                }
                continue;
            }

            let name = frame.name;
            stack.pop();
            if resolved.insert(name) {
                order.push(name.to_string());
            }
        }

        order
    }

    /// Order in which a sequential run executes the tasks.
    ///
    /// Walks tasks in registration order; each not-yet-ordered task is
    /// preceded by whichever of its dependencies are not ordered yet.
    pub fn execution_order(&self) -> Vec<TaskName> {
        let mut ordered: HashSet<TaskName> = HashSet::with_capacity(self.graph.len());
        let mut sequence: Vec<TaskName> = Vec::with_capacity(self.graph.len());

        for name in self.graph.tasks() {
            if ordered.contains(name) {
                continue;
            }

            for dep in self.expand(name) {
                if ordered.insert(dep.clone()) {
                    sequence.push(dep);
                }
            }
        }

        sequence
    }

    /// The resolved dependency set of every task.
    pub fn dependency_sets(&self) -> HashMap<TaskName, HashSet<TaskName>> {
        self.graph
            .tasks()
            .map(|name| {
                let mut deps: HashSet<TaskName> = self.expand(name).into_iter().collect();
                deps.remove(name);
                (name.to_string(), deps)
            })
            .collect()
    }
}
