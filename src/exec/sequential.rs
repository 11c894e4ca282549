// src/exec/sequential.rs

use tracing::{debug, warn};

use crate::dag::DependencyResolver;
use crate::errors::{MaxparError, Result};
use crate::exec::{ExecutionPlan, ExecutorId, RunContext, RunReport};
use crate::types::FailurePolicy;

/// Runs all tasks one at a time, in the caller's thread.
pub struct SequentialExecutor<'a, S> {
    plan: ExecutionPlan<'a, S>,
}

impl<'a, S> SequentialExecutor<'a, S> {
    pub fn new(plan: ExecutionPlan<'a, S>) -> Self {
        Self { plan }
    }

    /// Execute every task once, each after its full dependency set.
    ///
    /// A panicking action unwinds through the caller.
    pub fn run(&self, state: &S) -> Result<RunReport> {
        let resolver = DependencyResolver::new(self.plan.graph);
        let mut ctx = RunContext::new(&resolver);
        let executor = ExecutorId::Caller(std::thread::current().id());

        debug!(tasks = ctx.queued(), "sequential run starting");

        while let Some(name) = ctx.pop_next() {
            if ctx.blocked_by_failure(&name) {
                ctx.mark_skipped(&name);
                continue;
            }

            let Some(task) = self.plan.tasks.get(&name) else {
                warn!(task = %name, "ordered task not registered; ignoring");
                continue;
            };

            ctx.mark_started(&name);
            self.plan.reporter.task_started(&name, executor);

            match task.run(state) {
                Ok(()) => ctx.mark_completed(&name),
                Err(source) => match self.plan.options.failure_policy {
                    FailurePolicy::Abort => {
                        warn!(
                            task = %name,
                            error = %format!("{source:#}"),
                            "task failed; aborting sequential run"
                        );
                        return Err(MaxparError::TaskFailed { task: name, source });
                    }
                    FailurePolicy::Isolate => ctx.mark_failed(&name, &source),
                },
            }
        }

        let report = ctx.into_report();
        debug!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "sequential run finished"
        );
        Ok(report)
    }
}
