// src/store.rs

//! A keyed store of named cells for task actions to share.
//!
//! The scheduling engine never touches this type: it only reasons about the
//! key names tasks declare. Each cell has its own lock so that tasks touching
//! different keys never contend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};

#[derive(Debug, Default)]
pub struct SharedStore<V> {
    cells: HashMap<String, Mutex<V>>,
}

impl<V> SharedStore<V> {
    /// Build a store from initial `(key, value)` pairs. The key set is fixed.
    pub fn new<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            cells: entries
                .into_iter()
                .map(|(k, v)| (k.into(), Mutex::new(v)))
                .collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    fn cell(&self, key: &str) -> Result<MutexGuard<'_, V>> {
        let cell = self
            .cells
            .get(key)
            .ok_or_else(|| anyhow!("unknown shared-state key '{key}'"))?;
        cell.lock()
            .map_err(|_| anyhow!("shared-state cell '{key}' is poisoned"))
    }

    pub fn set(&self, key: &str, value: V) -> Result<()> {
        *self.cell(key)? = value;
        Ok(())
    }

    /// Apply `f` to the value under `key` and return its result.
    pub fn update<R>(&self, key: &str, f: impl FnOnce(&mut V) -> R) -> Result<R> {
        let mut guard = self.cell(key)?;
        Ok(f(&mut *guard))
    }
}

impl<V: Clone> SharedStore<V> {
    pub fn get(&self, key: &str) -> Result<V> {
        Ok(self.cell(key)?.clone())
    }

    /// Copy of every cell, for comparing end states.
    pub fn snapshot(&self) -> Result<HashMap<String, V>> {
        self.cells
            .keys()
            .map(|k| Ok((k.clone(), self.get(k)?)))
            .collect()
    }
}
