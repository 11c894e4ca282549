// src/dag/validate.rs

//! Fail-fast validation of a task list against its precedence mapping.
//!
//! Checks run in a fixed order and the first violation wins:
//! 1. every task has a precedence entry, and no name is registered twice
//!    (checked per task, in registration order);
//! 2. every key and predecessor in the mapping names a registered task;
//! 3. no task lists itself as a predecessor;
//! 4. the predecessor relation is acyclic.

use std::collections::{HashMap, HashSet};

use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::dag::graph::Precedence;
use crate::errors::{GraphViolation, MaxparError, Result};

/// Validate `names` (in registration order) against `precedence`.
pub fn validate_precedence(names: &[&str], precedence: &Precedence) -> Result<()> {
    validate_registration(names, precedence)?;
    validate_known_names(names, precedence)?;
    validate_no_self_dependency(precedence)?;
    validate_acyclic(names, precedence)?;

    debug!(tasks = names.len(), "precedence mapping validated");
    Ok(())
}

fn validate_registration(names: &[&str], precedence: &Precedence) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(names.len());

    for &name in names {
        if !precedence.contains_key(name) {
            return Err(MaxparError::MissingPrecedence(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(MaxparError::DuplicateTask(name.to_string()));
        }
    }
    Ok(())
}

fn validate_known_names(names: &[&str], precedence: &Precedence) -> Result<()> {
    let known: HashSet<&str> = names.iter().copied().collect();

    if let Some(unknown) = precedence.keys().find(|k| !known.contains(k.as_str())) {
        return Err(MaxparError::UnknownTask(unknown.clone()));
    }

    for preds in precedence.values() {
        if let Some(unknown) = preds.iter().find(|p| !known.contains(p.as_str())) {
            return Err(MaxparError::UnknownTask(unknown.clone()));
        }
    }
    Ok(())
}

fn validate_no_self_dependency(precedence: &Precedence) -> Result<()> {
    for (name, preds) in precedence {
        if preds.iter().any(|p| p == name) {
            return Err(GraphViolation::SelfDependency(name.clone()).into());
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current traversal path.
    OnStack,
    /// Fully explored; no cycle reachable from here.
    Done,
}

/// One frame of the explicit DFS stack: a node plus the successors still to visit.
struct Frame<'a> {
    node: &'a str,
    successors: Vec<&'a str>,
    next: usize,
}

fn validate_acyclic(names: &[&str], precedence: &Precedence) -> Result<()> {
    // Edge direction: predecessor -> task (the successor relation).
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for &name in names {
        graph.add_node(name);
    }
    for (name, preds) in precedence {
        for pred in preds {
            graph.add_edge(pred.as_str(), name.as_str(), ());
        }
    }

    let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(names.len());

    for &root in names {
        if marks.contains_key(root) {
            continue;
        }

        marks.insert(root, Mark::OnStack);
        let mut stack = vec![Frame {
            node: root,
            successors: graph.neighbors(root).collect(),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.successors.len() {
                marks.insert(frame.node, Mark::Done);
                stack.pop();
                continue;
            }

            let succ = frame.successors[frame.next];
            frame.next += 1;

            match marks.get(succ) {
                Some(Mark::OnStack) => {
                    return Err(GraphViolation::Cycle(succ.to_string()).into());
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(succ, Mark::OnStack);
                    stack.push(Frame {
                        node: succ,
                        successors: graph.neighbors(succ).collect(),
                        next: 0,
                    });
                }
            }
        }
    }

    Ok(())
}
