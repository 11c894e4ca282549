// src/dag/mod.rs

//! Task definitions and the precedence graph.
//!
//! - [`task`] holds the immutable [`Task`] and the pairwise conflict rule.
//! - [`graph`] holds the validated [`PrecedenceGraph`].
//! - [`validate`] contains the fail-fast construction checks.
//! - [`resolver`] computes transitive dependency sets and execution orders.

pub mod graph;
pub mod resolver;
pub mod task;
pub mod validate;

pub use graph::{Precedence, PrecedenceGraph};
pub use resolver::DependencyResolver;
pub use task::{Action, Task};
