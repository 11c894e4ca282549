// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::types::TaskName;

/// Structural problem found in a precedence mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphViolation {
    #[error("task '{0}' cannot depend on itself")]
    SelfDependency(TaskName),

    #[error("precedence mapping contains a cycle involving task '{0}'")]
    Cycle(TaskName),
}

#[derive(Error, Debug)]
pub enum MaxparError {
    #[error("duplicate task found: '{0}'")]
    DuplicateTask(TaskName),

    #[error("task '{0}' has no precedence entry")]
    MissingPrecedence(TaskName),

    #[error("task '{0}' not found in the list of tasks")]
    UnknownTask(TaskName),

    #[error("invalid precedence graph: {0}")]
    InvalidGraph(GraphViolation),

    #[error("task '{task}' failed: {source}")]
    TaskFailed {
        task: TaskName,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<GraphViolation> for MaxparError {
    fn from(violation: GraphViolation) -> Self {
        MaxparError::InvalidGraph(violation)
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, MaxparError>;
