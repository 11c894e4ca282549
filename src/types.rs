use std::str::FromStr;

use serde::Deserialize;

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// What a run does when a task action returns an error.
///
/// - `Abort`: stop starting new tasks, let running ones finish, and return the
///   first failure to the caller (default).
/// - `Isolate`: record the failure, skip every task that transitively depends
///   on the failed one, and keep scheduling the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    Abort,
    Isolate,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Abort
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "isolate" => Ok(FailurePolicy::Isolate),
            other => Err(format!(
                "invalid failure_policy: {other} (expected \"abort\" or \"isolate\")"
            )),
        }
    }
}

/// Which declared key overlaps prevent two tasks from running together.
///
/// `ReadWrite` only looks at read/write and write/read overlaps, so two tasks
/// writing the same key with disjoint reads may run at the same time. `Strict`
/// also rejects write/write overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictRule {
    ReadWrite,
    Strict,
}

impl Default for ConflictRule {
    fn default() -> Self {
        ConflictRule::ReadWrite
    }
}

impl FromStr for ConflictRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read-write" | "read_write" => Ok(ConflictRule::ReadWrite),
            "strict" => Ok(ConflictRule::Strict),
            other => Err(format!(
                "invalid conflict_rule: {other} (expected \"read-write\" or \"strict\")"
            )),
        }
    }
}

/// Log level accepted by [`crate::logging::init_logging`] and the config file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("invalid log level: {other}")),
        }
    }
}
