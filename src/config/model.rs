// src/config/model.rs

use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::exec::EngineOptions;
use crate::types::{ConflictRule, FailurePolicy, LogLevel};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [engine]
/// logging = true
/// max_concurrency = 4
/// failure_policy = "isolate"
/// conflict_rule = "strict"
/// log_level = "debug"
/// ```
///
/// Every section and key is optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub engine: EngineSection,
}

/// `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    /// Report every task start. Defaults to `true`.
    #[serde(default = "default_logging")]
    pub logging: bool,

    /// Ceiling on simultaneously running tasks in parallel mode.
    ///
    /// Absent means no ceiling: one unit per ready, non-conflicting task.
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// `"abort"` (default) or `"isolate"`.
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// `"read-write"` (default) or `"strict"`.
    #[serde(default)]
    pub conflict_rule: ConflictRule,

    /// Level handed to `logging::init_logging` by callers that want it.
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

fn default_logging() -> bool {
    true
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            logging: default_logging(),
            max_concurrency: None,
            failure_policy: FailurePolicy::default(),
            conflict_rule: ConflictRule::default(),
            log_level: None,
        }
    }
}

/// Validated configuration. Build one with `ConfigFile::try_from(raw)` or
/// [`crate::config::load_and_validate`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub engine: EngineSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(engine: EngineSection) -> Self {
        Self { engine }
    }

    /// Runtime options derived from `[engine]`.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            logging: self.engine.logging,
            max_concurrency: self.engine.max_concurrency.and_then(NonZeroUsize::new),
            failure_policy: self.engine.failure_policy,
            conflict_rule: self.engine.conflict_rule,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(EngineSection::default())
    }
}
