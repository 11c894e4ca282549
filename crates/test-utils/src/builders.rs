use maxpar::{Precedence, Task};

/// Builder for a precedence mapping.
#[derive(Debug, Default)]
pub struct PrecedenceBuilder {
    precedence: Precedence,
}

impl PrecedenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the entry for `task`.
    pub fn entry(mut self, task: &str, after: &[&str]) -> Self {
        self.precedence.insert(
            task.to_string(),
            after.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn build(self) -> Precedence {
        self.precedence
    }
}

/// Shorthand for a precedence mapping from `(task, predecessors)` pairs.
pub fn precedence(entries: &[(&str, &[&str])]) -> Precedence {
    entries
        .iter()
        .fold(PrecedenceBuilder::new(), |b, (task, after)| b.entry(task, after))
        .build()
}

/// A task with the given key sets whose action does nothing.
pub fn noop_task<S: 'static>(name: &str, reads: &[&str], writes: &[&str]) -> Task<S> {
    Task::noop(name, reads.iter().copied(), writes.iter().copied())
}

/// Independent no-op tasks named `t0..tN` with an empty precedence mapping
/// entry each.
pub fn independent_tasks<S: 'static>(count: usize) -> (Vec<Task<S>>, Precedence) {
    let names: Vec<String> = (0..count).map(|i| format!("t{i}")).collect();
    let tasks = names
        .iter()
        .map(|n| Task::noop(n.as_str(), Vec::<String>::new(), Vec::<String>::new()))
        .collect();
    let precedence = names.into_iter().map(|n| (n, Vec::new())).collect();
    (tasks, precedence)
}
