// src/lib.rs

//! Precedence-and-conflict task scheduling.
//!
//! A [`TaskSystem`] owns a fixed set of named [`Task`]s that share a state
//! handle, plus a validated precedence graph saying which tasks must finish
//! before which. It can run them:
//!
//! - sequentially, in one dependency-consistent order on the caller's thread
//!   ([`TaskSystem::run_sequential`]), or
//! - in parallel on tokio, starting each task as soon as its dependencies are
//!   done and no running task touches its declared keys in a conflicting way
//!   ([`TaskSystem::run_parallel`]).
//!
//! ```no_run
//! use std::sync::Arc;
//! use maxpar::{Precedence, SharedStore, Task, TaskSystem};
//!
//! # async fn demo() -> maxpar::Result<()> {
//! let tasks = vec![
//!     Task::new("T1", Vec::<String>::new(), ["X"], |s: &SharedStore<i64>| s.set("X", 5)),
//!     Task::new("T2", ["X"], ["Y"], |s: &SharedStore<i64>| {
//!         let x = s.get("X")?;
//!         s.set("Y", x * 2)
//!     }),
//! ];
//! let precedence: Precedence = [
//!     ("T1".to_string(), vec![]),
//!     ("T2".to_string(), vec!["T1".to_string()]),
//! ]
//! .into_iter()
//! .collect();
//!
//! let system = TaskSystem::new(tasks, &precedence)?;
//! let state = Arc::new(SharedStore::new([("X", 0), ("Y", 0)]));
//! system.run_parallel(state).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod store;
pub mod system;
pub mod types;

pub use dag::{DependencyResolver, Precedence, PrecedenceGraph, Task};
pub use errors::{GraphViolation, MaxparError, Result};
pub use exec::{EngineOptions, ExecutorId, RunReport, TaskStarted};
pub use store::SharedStore;
pub use system::TaskSystem;
pub use types::{ConflictRule, FailurePolicy, LogLevel, TaskName};
