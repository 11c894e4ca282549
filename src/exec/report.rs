// src/exec/report.rs

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::exec::ExecutorId;
use crate::types::TaskName;

/// Event emitted when a task starts and logging is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStarted {
    pub task: TaskName,
    pub executor: ExecutorId,
}

/// Reports task starts to the log and to an optional event sink.
#[derive(Debug, Clone, Default)]
pub struct StartReporter {
    enabled: bool,
    sink: Option<mpsc::UnboundedSender<TaskStarted>>,
}

impl StartReporter {
    pub fn new(enabled: bool, sink: Option<mpsc::UnboundedSender<TaskStarted>>) -> Self {
        Self { enabled, sink }
    }

    pub fn task_started(&self, task: &str, executor: ExecutorId) {
        if !self.enabled {
            trace!(task = %task, %executor, "task started (reporting disabled)");
            return;
        }

        info!(task = %task, %executor, "running task");

        if let Some(sink) = &self.sink {
            let event = TaskStarted {
                task: task.to_string(),
                executor,
            };
            if sink.send(event).is_err() {
                debug!(task = %task, "event sink closed; dropping task start event");
            }
        }
    }
}
