// src/exec/run_context.rs

//! Per-run bookkeeping shared by both execution strategies.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::dag::{DependencyResolver, PrecedenceGraph};
use crate::exec::RunReport;
use crate::types::TaskName;

/// Ephemeral state of one run: the pending queue plus which tasks are
/// running, completed, failed or skipped. Dropped when the run returns.
#[derive(Debug)]
pub struct RunContext<'g> {
    graph: &'g PrecedenceGraph,
    queue: VecDeque<TaskName>,
    dependency_sets: HashMap<TaskName, HashSet<TaskName>>,
    running: HashSet<TaskName>,
    completed: HashSet<TaskName>,
    /// Transitive dependents of every failed task.
    blocked: HashSet<TaskName>,
    report: RunReport,
}

impl<'g> RunContext<'g> {
    /// Seed the queue with the dependency-consistent execution order.
    pub fn new(resolver: &DependencyResolver<'g>) -> Self {
        Self {
            graph: resolver.graph(),
            queue: resolver.execution_order().into(),
            dependency_sets: resolver.dependency_sets(),
            running: HashSet::new(),
            completed: HashSet::new(),
            blocked: HashSet::new(),
            report: RunReport::default(),
        }
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pop_next(&mut self) -> Option<TaskName> {
        self.queue.pop_front()
    }

    /// Put a task that could not start yet at the back of the queue.
    pub fn requeue(&mut self, task: TaskName) {
        self.queue.push_back(task);
    }

    /// Drop everything still queued. Returns what was dropped.
    pub fn abandon_queue(&mut self) -> Vec<TaskName> {
        self.queue.drain(..).collect()
    }

    pub fn running(&self) -> impl Iterator<Item = &str> {
        self.running.iter().map(|s| s.as_str())
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Whether every task in `task`'s transitive dependency set has completed.
    pub fn deps_completed(&self, task: &str) -> bool {
        match self.dependency_sets.get(task) {
            Some(deps) => deps.iter().all(|d| self.completed.contains(d)),
            None => {
                warn!(task = %task, "task missing from dependency sets");
                false
            }
        }
    }

    /// Whether some transitive dependency of `task` has failed.
    pub fn blocked_by_failure(&self, task: &str) -> bool {
        self.blocked.contains(task)
    }

    pub fn mark_started(&mut self, task: &str) {
        self.running.insert(task.to_string());
        self.report.started.push(task.to_string());
        self.report.max_parallelism = self.report.max_parallelism.max(self.running.len());
    }

    pub fn mark_completed(&mut self, task: &str) {
        self.running.remove(task);
        self.completed.insert(task.to_string());
        self.report.completed.push(task.to_string());
        debug!(task = %task, completed = self.completed.len(), "task completed");
    }

    pub fn mark_failed(&mut self, task: &str, error: &anyhow::Error) {
        self.running.remove(task);
        self.block_dependents_of(task);
        self.report
            .failed
            .push((task.to_string(), format!("{error:#}")));
        warn!(task = %task, error = %format!("{error:#}"), "task failed");
    }

    /// Walk the successor relation from `failed` and block everything reached.
    fn block_dependents_of(&mut self, failed: &str) {
        let graph = self.graph;
        let mut stack: Vec<&str> = vec![failed];

        while let Some(name) = stack.pop() {
            for dependent in graph.dependents_of(name) {
                if self.blocked.insert(dependent.clone()) {
                    stack.push(dependent.as_str());
                }
            }
        }
    }

    pub fn mark_skipped(&mut self, task: &str) {
        debug!(task = %task, "skipping task; a dependency failed");
        self.report.skipped.push(task.to_string());
    }

    pub fn into_report(self) -> RunReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::{Precedence, PrecedenceGraph, Task};

    fn chain() -> PrecedenceGraph {
        let tasks: Vec<Task<()>> = ["A", "B", "C"]
            .into_iter()
            .map(|n| Task::noop(n, Vec::<String>::new(), Vec::<String>::new()))
            .collect();
        let precedence: Precedence = [
            ("A".to_string(), vec![]),
            ("B".to_string(), vec!["A".to_string()]),
            ("C".to_string(), vec!["B".to_string()]),
        ]
        .into_iter()
        .collect();
        PrecedenceGraph::build(&tasks, &precedence).unwrap()
    }

    #[test]
    fn readiness_follows_completion() {
        let g = chain();
        let mut ctx = RunContext::new(&DependencyResolver::new(&g));

        assert!(ctx.deps_completed("A"));
        assert!(!ctx.deps_completed("C"));

        ctx.mark_started("A");
        ctx.mark_completed("A");
        assert!(ctx.deps_completed("B"));
        assert!(!ctx.deps_completed("C"), "C needs B as well as A");
    }

    #[test]
    fn failure_blocks_transitive_dependents() {
        let g = chain();
        let mut ctx = RunContext::new(&DependencyResolver::new(&g));

        ctx.mark_started("A");
        ctx.mark_failed("A", &anyhow::anyhow!("boom"));

        assert!(ctx.blocked_by_failure("B"));
        assert!(ctx.blocked_by_failure("C"));
        assert!(!ctx.blocked_by_failure("A"));

        let report = ctx.into_report();
        assert_eq!(report.failed, vec![("A".to_string(), "boom".to_string())]);
    }

    #[test]
    fn failure_leaves_unrelated_branches_runnable() {
        // A before B and C, both before E; D independent. C fails.
        let tasks: Vec<Task<()>> = ["A", "B", "C", "D", "E"]
            .into_iter()
            .map(|n| Task::noop(n, Vec::<String>::new(), Vec::<String>::new()))
            .collect();
        let precedence: Precedence = [
            ("A".to_string(), vec![]),
            ("B".to_string(), vec!["A".to_string()]),
            ("C".to_string(), vec!["A".to_string()]),
            ("D".to_string(), vec![]),
            ("E".to_string(), vec!["B".to_string(), "C".to_string()]),
        ]
        .into_iter()
        .collect();
        let g = PrecedenceGraph::build(&tasks, &precedence).unwrap();
        let mut ctx = RunContext::new(&DependencyResolver::new(&g));

        ctx.mark_started("C");
        ctx.mark_failed("C", &anyhow::anyhow!("boom"));

        assert!(ctx.blocked_by_failure("E"));
        assert!(!ctx.blocked_by_failure("B"));
        assert!(!ctx.blocked_by_failure("D"));
        assert!(!ctx.blocked_by_failure("A"));
    }

    #[test]
    fn requeue_goes_to_the_back() {
        let g = chain();
        let mut ctx = RunContext::new(&DependencyResolver::new(&g));

        let first = ctx.pop_next().unwrap();
        ctx.requeue(first.clone());

        assert_eq!(ctx.queued(), 3);
        assert_eq!(ctx.abandon_queue().last(), Some(&first));
        assert!(ctx.queue_is_empty());
    }

    #[test]
    fn max_parallelism_tracks_peak() {
        let g = chain();
        let mut ctx = RunContext::new(&DependencyResolver::new(&g));

        ctx.mark_started("A");
        ctx.mark_started("B");
        ctx.mark_completed("A");
        ctx.mark_started("C");

        assert_eq!(ctx.running_count(), 2);
        assert_eq!(ctx.into_report().max_parallelism, 2);
    }
}
