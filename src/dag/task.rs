// src/dag/task.rs

//! Task definition and the pairwise conflict rule.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::types::{ConflictRule, TaskName};

/// Action run for a task. It receives the shared-state handle by reference.
pub type Action<S> = Arc<dyn Fn(&S) -> anyhow::Result<()> + Send + Sync>;

/// Immutable description of one unit of work.
///
/// `reads` and `writes` name the shared-state keys the action touches. The
/// engine never looks at the state itself; these declarations are the only
/// input to conflict checking.
pub struct Task<S> {
    name: TaskName,
    reads: BTreeSet<String>,
    writes: BTreeSet<String>,
    action: Action<S>,
}

impl<S: 'static> Task<S> {
    pub fn new<R, W, F>(name: impl Into<TaskName>, reads: R, writes: W, action: F) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
        F: Fn(&S) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            reads: reads.into_iter().map(Into::into).collect(),
            writes: writes.into_iter().map(Into::into).collect(),
            action: Arc::new(action),
        }
    }

    /// A task whose action does nothing. Handy for graph-only checks.
    pub fn noop<R, W>(name: impl Into<TaskName>, reads: R, writes: W) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        Self::new(name, reads, writes, |_: &S| Ok(()))
    }
}

impl<S> Task<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reads(&self) -> &BTreeSet<String> {
        &self.reads
    }

    pub fn writes(&self) -> &BTreeSet<String> {
        &self.writes
    }

    pub fn action(&self) -> Action<S> {
        Arc::clone(&self.action)
    }

    /// Run the action against `state`.
    pub fn run(&self, state: &S) -> anyhow::Result<()> {
        (self.action)(state)
    }

    /// Whether `self` and `other` may not run at the same time.
    ///
    /// Symmetric. Under [`ConflictRule::ReadWrite`] two tasks that only share
    /// written keys do *not* conflict.
    pub fn conflicts_with(&self, other: &Task<S>, rule: ConflictRule) -> bool {
        let read_write = !self.reads.is_disjoint(&other.writes)
            || !self.writes.is_disjoint(&other.reads);

        match rule {
            ConflictRule::ReadWrite => read_write,
            ConflictRule::Strict => read_write || !self.writes.is_disjoint(&other.writes),
        }
    }
}

impl<S> Clone for Task<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            reads: self.reads.clone(),
            writes: self.writes.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<S> fmt::Debug for Task<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .finish_non_exhaustive()
    }
}
