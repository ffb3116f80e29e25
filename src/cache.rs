//! Memoization of CCT results keyed by the original hex string.
//!
//! Entries are write-once and never evicted: a CCT is a pure function of its
//! hex string, so a cached value is always what a fresh computation would
//! return. Lifecycle is the owning [`crate::Annotator`]'s.

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;
use crate::log_cache_operation;

#[derive(Debug, Default)]
pub struct CctCache {
    /// RwLock so concurrent hits don't serialize
    entries: RwLock<AHashMap<String, f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CctCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Peek without touching statistics
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.read().get(key).copied()
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// The check-compute-store sequence runs under the write lock, so each
    /// distinct key is computed at most once even with concurrent callers.
    /// Failed computations are not stored.
    pub fn get_or_try_insert_with<F>(&self, key: &str, compute: F) -> Result<f64>
    where
        F: FnOnce() -> Result<f64>,
    {
        // fast path with read lock only
        if let Some(value) = self.entries.read().get(key).copied() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log_cache_operation!(hit, key, "cct cache");
            return Ok(value);
        }

        let mut entries = self.entries.write();
        // another caller may have filled it while we waited for the lock
        if let Some(value) = entries.get(key).copied() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log_cache_operation!(hit, key, "cct cache");
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        log_cache_operation!(miss, key, "cct cache");

        let value = compute()?;
        entries.insert(key.to_string(), value);
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    /// One per computation attempt, successful or not
    pub misses: u64,
    pub size: usize,
}

impl CacheStats {
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        let lookups = self.lookups();
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
