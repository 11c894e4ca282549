// src/system.rs

//! The public facade: a validated set of tasks plus their precedence graph.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::config::ConfigFile;
use crate::dag::{DependencyResolver, Precedence, PrecedenceGraph, Task};
use crate::errors::Result;
use crate::exec::{
    EngineOptions, ExecutionPlan, ParallelExecutor, RunReport, SequentialExecutor, StartReporter,
    TaskStarted,
};
use crate::types::TaskName;

/// Tasks sharing a state handle of type `S`, with a validated precedence
/// graph. Construction fails on any malformed input; a `TaskSystem` value is
/// always runnable.
pub struct TaskSystem<S> {
    tasks: HashMap<TaskName, Task<S>>,
    graph: PrecedenceGraph,
    options: EngineOptions,
    event_sink: Option<mpsc::UnboundedSender<TaskStarted>>,
}

impl<S> fmt::Debug for TaskSystem<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSystem")
            .field("graph", &self.graph)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<S> TaskSystem<S> {
    /// Validate `tasks` against `precedence` and build the system.
    pub fn new(tasks: Vec<Task<S>>, precedence: &Precedence) -> Result<Self> {
        let graph = PrecedenceGraph::build(&tasks, precedence)?;
        let tasks = tasks
            .into_iter()
            .map(|task| (task.name().to_string(), task))
            .collect();

        debug!(tasks = graph.len(), "task system constructed");

        Ok(Self {
            tasks,
            graph,
            options: EngineOptions::default(),
            event_sink: None,
        })
    }

    /// Like [`TaskSystem::new`], with options taken from a loaded config.
    pub fn from_config(
        tasks: Vec<Task<S>>,
        precedence: &Precedence,
        cfg: &ConfigFile,
    ) -> Result<Self> {
        Ok(Self::new(tasks, precedence)?.with_options(cfg.engine_options()))
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Send a [`TaskStarted`] event to `sink` for every task start while
    /// logging is enabled.
    pub fn with_event_sink(mut self, sink: mpsc::UnboundedSender<TaskStarted>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Toggle reporting of task starts.
    pub fn set_logging(&mut self, enabled: bool) {
        self.options.logging = enabled;
    }

    pub fn logging_enabled(&self) -> bool {
        self.options.logging
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The validated precedence graph, e.g. for display.
    pub fn precedence(&self) -> &PrecedenceGraph {
        &self.graph
    }

    /// Registered tasks, in registration order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task<S>> {
        self.graph.tasks().filter_map(|name| self.tasks.get(name))
    }

    pub fn task(&self, name: &str) -> Option<&Task<S>> {
        self.tasks.get(name)
    }

    /// Every task that must run before `name`, in dependency order.
    pub fn get_dependencies(&self, name: &str) -> Result<Vec<TaskName>> {
        DependencyResolver::new(&self.graph).dependencies_of(name)
    }

    /// Run every task once, one at a time, on the calling thread.
    pub fn run_sequential(&self, state: &S) -> Result<RunReport> {
        let reporter = self.reporter();
        SequentialExecutor::new(self.plan(&reporter)).run(state)
    }

    fn reporter(&self) -> StartReporter {
        StartReporter::new(self.options.logging, self.event_sink.clone())
    }

    fn plan<'a>(&'a self, reporter: &'a StartReporter) -> ExecutionPlan<'a, S> {
        ExecutionPlan {
            tasks: &self.tasks,
            graph: &self.graph,
            options: &self.options,
            reporter,
        }
    }
}

impl<S: Send + Sync + 'static> TaskSystem<S> {
    /// Run every task once with as much safe concurrency as the graph and the
    /// declared read/write sets allow.
    pub async fn run_parallel(&self, state: Arc<S>) -> Result<RunReport> {
        let reporter = self.reporter();
        ParallelExecutor::new(self.plan(&reporter)).run(state).await
    }
}
