// src/config/mod.rs

//! Engine configuration loaded from TOML.
//!
//! - [`model`] holds the serde types.
//! - [`validate`] turns a [`RawConfigFile`] into a checked [`ConfigFile`].
//! - [`loader`] reads files from disk.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str};
pub use model::{ConfigFile, EngineSection, RawConfigFile};
