//! Process-wide dataset cache

use polars::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::Result;

/// Cache of loaded base tables, keyed by source identity (URL, path, or any
/// stable identifier the caller chooses).
///
/// Entries live for the duration of the process; there is no eviction because
/// the dashboard works against a handful of static datasets. Access is shared
/// and read-only: every hit hands out the same `Arc<DataFrame>`, and no caller
/// may mutate it in place. Derived columns go on a [`DatasetCache::copy_of`]
/// the caller owns.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<String, Arc<DataFrame>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hit/miss counters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to a cached table, if present.
    pub fn get(&self, key: &str) -> Option<Arc<DataFrame>> {
        let entries = self.entries.read().expect("cache lock poisoned");
        match entries.get(key) {
            Some(df) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(df))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Return the cached table for `key`, loading and inserting it on first use.
    pub fn get_or_load<F>(&self, key: &str, load: F) -> Result<Arc<DataFrame>>
    where
        F: FnOnce() -> Result<DataFrame>,
    {
        if let Some(df) = self.get(key) {
            return Ok(df);
        }

        let loaded = Arc::new(load()?);
        let mut entries = self.entries.write().expect("cache lock poisoned");
        // A concurrent loader may have won the race; keep the first insert.
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::clone(&loaded));
        Ok(Arc::clone(entry))
    }

    /// Insert (or replace) a table under `key`.
    pub fn insert(&self, key: &str, df: DataFrame) -> Arc<DataFrame> {
        let handle = Arc::new(df);
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.insert(key.to_string(), Arc::clone(&handle));
        handle
    }

    /// Detached copy of a cached table, safe to extend with derived columns.
    pub fn copy_of(&self, key: &str) -> Option<DataFrame> {
        self.get(key).map(|df| df.as_ref().clone())
    }

    /// Drop one entry
    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
