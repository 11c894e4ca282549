// src/exec/mod.rs

//! Execution strategies.
//!
//! - [`sequential`] runs every task on the caller's thread in one
//!   dependency-consistent order.
//! - [`parallel`] runs ready, mutually non-conflicting tasks concurrently on
//!   the tokio blocking pool.
//! - [`run_context`] holds the per-run bookkeeping both strategies share.
//! - [`report`] emits task-start events when logging is enabled.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::thread::ThreadId;

use crate::dag::{PrecedenceGraph, Task};
use crate::types::{ConflictRule, FailurePolicy, TaskName};

pub mod parallel;
pub mod report;
pub mod run_context;
pub mod sequential;

pub use parallel::ParallelExecutor;
pub use report::{StartReporter, TaskStarted};
pub use run_context::RunContext;
pub use sequential::SequentialExecutor;

/// Knobs shared by both execution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Report every task start (log line plus event sink).
    pub logging: bool,
    /// Upper bound on simultaneously running tasks in parallel mode.
    /// `None` means one unit per ready, non-conflicting task.
    pub max_concurrency: Option<NonZeroUsize>,
    pub failure_policy: FailurePolicy,
    pub conflict_rule: ConflictRule,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            logging: true,
            max_concurrency: None,
            failure_policy: FailurePolicy::default(),
            conflict_rule: ConflictRule::default(),
        }
    }
}

/// Identifies the unit of execution that ran a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutorId {
    /// Sequential mode: the thread that called `run_sequential`.
    Caller(ThreadId),
    /// Parallel mode: the tokio task the action ran on.
    Unit(tokio::task::Id),
}

impl fmt::Display for ExecutorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorId::Caller(id) => write!(f, "caller {id:?}"),
            ExecutorId::Unit(id) => write!(f, "unit {id}"),
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Task names in the order they were started.
    pub started: Vec<TaskName>,
    /// Task names in the order they were observed to complete successfully.
    pub completed: Vec<TaskName>,
    /// Failed tasks and their error messages (isolate policy only).
    pub failed: Vec<(TaskName, String)>,
    /// Tasks never started because a dependency failed (isolate policy only).
    pub skipped: Vec<TaskName>,
    /// Peak number of tasks the scheduler had running at once.
    pub max_parallelism: usize,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Everything an executor needs to know about the task system.
pub struct ExecutionPlan<'a, S> {
    pub tasks: &'a HashMap<TaskName, Task<S>>,
    pub graph: &'a PrecedenceGraph,
    pub options: &'a EngineOptions,
    pub reporter: &'a StartReporter,
}

impl<S> Clone for ExecutionPlan<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for ExecutionPlan<'_, S> {}
