// src/exec/parallel.rs

//! Greedy, conflict-aware parallel execution.
//!
//! The scheduler polls the pending queue front to back. A task starts as soon
//! as its whole dependency set has completed and it conflicts with no running
//! task; otherwise it goes to the back of the queue. After each pass the
//! scheduler blocks until at least one running unit finishes, reaps every
//! finished unit, and polls again. Polling is FIFO over re-insertions, so
//! there is no fairness guarantee between equally ready tasks.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::dag::DependencyResolver;
use crate::errors::{MaxparError, Result};
use crate::exec::{ExecutionPlan, ExecutorId, RunContext, RunReport};
use crate::types::{FailurePolicy, TaskName};

type UnitOutcome = std::result::Result<(Id, anyhow::Result<()>), JoinError>;

/// Running units of execution, keyed back to their task names.
struct Units {
    set: JoinSet<anyhow::Result<()>>,
    names: HashMap<Id, TaskName>,
}

/// Runs ready, mutually non-conflicting tasks concurrently.
pub struct ParallelExecutor<'a, S> {
    plan: ExecutionPlan<'a, S>,
}

impl<'a, S: Send + Sync + 'static> ParallelExecutor<'a, S> {
    pub fn new(plan: ExecutionPlan<'a, S>) -> Self {
        Self { plan }
    }

    /// Execute every task once and return when all started units are done.
    ///
    /// Must be awaited inside a tokio runtime; actions run on the blocking
    /// pool.
    pub async fn run(&self, state: Arc<S>) -> Result<RunReport> {
        let resolver = DependencyResolver::new(self.plan.graph);
        let mut ctx = RunContext::new(&resolver);
        let mut units = Units {
            set: JoinSet::new(),
            names: HashMap::new(),
        };
        let mut first_failure: Option<(TaskName, anyhow::Error)> = None;

        debug!(
            tasks = ctx.queued(),
            max_concurrency = ?self.plan.options.max_concurrency,
            rule = ?self.plan.options.conflict_rule,
            "parallel run starting"
        );

        loop {
            let progressed = if first_failure.is_none() {
                self.start_ready(&mut ctx, &mut units, &state)
            } else {
                false
            };

            if units.set.is_empty() {
                if ctx.queue_is_empty() || first_failure.is_some() {
                    break;
                }
                if !progressed {
                    // A validated graph always has a startable task here; only a
                    // plan whose task map disagrees with its graph can stall.
                    return Err(anyhow!(
                        "parallel scheduler stalled with {} queued tasks and none running",
                        ctx.queued()
                    )
                    .into());
                }
                continue;
            }

            // Block until at least one unit finishes, then reap the rest that
            // are already done.
            if let Some(outcome) = units.set.join_next_with_id().await {
                self.reap(outcome, &mut ctx, &mut units, &mut first_failure);
            }
            while let Some(outcome) = units.set.try_join_next_with_id() {
                self.reap(outcome, &mut ctx, &mut units, &mut first_failure);
            }
        }

        if let Some((task, source)) = first_failure {
            return Err(MaxparError::TaskFailed { task, source });
        }

        let report = ctx.into_report();
        info!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            max_parallelism = report.max_parallelism,
            "parallel run finished"
        );
        Ok(report)
    }

    /// One pass over the queue. Returns whether any task started or was skipped.
    fn start_ready(
        &self,
        ctx: &mut RunContext<'_>,
        units: &mut Units,
        state: &Arc<S>,
    ) -> bool {
        let mut progressed = false;

        for _ in 0..ctx.queued() {
            let Some(name) = ctx.pop_next() else {
                break;
            };

            if ctx.blocked_by_failure(&name) {
                ctx.mark_skipped(&name);
                progressed = true;
                continue;
            }

            if !ctx.deps_completed(&name)
                || self.at_ceiling(ctx)
                || self.conflicts_with_running(&name, ctx)
            {
                ctx.requeue(name);
                continue;
            }

            let Some(task) = self.plan.tasks.get(&name) else {
                warn!(task = %name, "queued task not registered; dropping");
                continue;
            };

            let action = task.action();
            let unit_state = Arc::clone(state);
            let handle = units.set.spawn_blocking(move || action(&*unit_state));
            let id = handle.id();

            units.names.insert(id, name.clone());
            ctx.mark_started(&name);
            self.plan.reporter.task_started(&name, ExecutorId::Unit(id));
            progressed = true;
        }

        progressed
    }

    fn at_ceiling(&self, ctx: &RunContext<'_>) -> bool {
        self.plan
            .options
            .max_concurrency
            .is_some_and(|max| ctx.running_count() >= max.get())
    }

    fn conflicts_with_running(&self, name: &str, ctx: &RunContext<'_>) -> bool {
        let Some(candidate) = self.plan.tasks.get(name) else {
            return false;
        };
        let rule = self.plan.options.conflict_rule;

        ctx.running().any(|running| {
            self.plan
                .tasks
                .get(running)
                .is_some_and(|other| candidate.conflicts_with(other, rule))
        })
    }

    fn reap(
        &self,
        outcome: UnitOutcome,
        ctx: &mut RunContext<'_>,
        units: &mut Units,
        first_failure: &mut Option<(TaskName, anyhow::Error)>,
    ) {
        let (id, result) = match outcome {
            Ok((id, result)) => (id, result),
            Err(err) => (err.id(), Err(join_error_to_anyhow(err))),
        };

        let Some(name) = units.names.remove(&id) else {
            warn!(unit = %id, "completion from unknown unit; ignoring");
            return;
        };

        let source = match result {
            Ok(()) => {
                ctx.mark_completed(&name);
                return;
            }
            Err(source) => source,
        };

        ctx.mark_failed(&name, &source);

        if self.plan.options.failure_policy == FailurePolicy::Abort && first_failure.is_none() {
            let dropped = ctx.abandon_queue();
            warn!(
                task = %name,
                not_started = dropped.len(),
                still_running = ctx.running_count(),
                "task failed; aborting parallel run"
            );
            *first_failure = Some((name, source));
        }
    }
}

fn join_error_to_anyhow(err: JoinError) -> anyhow::Error {
    if err.is_panic() {
        let payload = err.into_panic();
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        anyhow!("task panicked: {msg}")
    } else {
        anyhow!("task unit was cancelled")
    }
}
