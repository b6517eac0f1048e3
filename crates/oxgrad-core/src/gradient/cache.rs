//! Shared cache of built gradient tables
//!
//! Tables are a pure function of the gradient, the destination color space
//! and the premultiplication flag, so concurrent draws of the same gradient
//! can share one. Builds happen outside the lock; when two threads race, the
//! first insert wins and the other build is dropped. Once full, the least
//! recently used table is evicted.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use log::trace;
use lru::LruCache;

use crate::color::ColorSpace;
use crate::gradient::{GradientSpec, GradientTable};
use crate::Result;

/// Default number of tables kept
pub const DEFAULT_CAPACITY: usize = 256;

/// Identifies one built table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKey {
    spec_id: u64,
    dst_color_space: [u32; 10],
    in_premul: bool,
}

impl TableKey {
    pub fn new(spec: &GradientSpec, dst: &ColorSpace) -> Self {
        Self {
            spec_id: spec.id(),
            dst_color_space: dst.key(),
            in_premul: spec.interpolate_in_premul(),
        }
    }
}

/// Hit and build counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub builds: usize,
}

/// Thread-safe LRU table cache
#[derive(Debug)]
pub struct TableCache {
    tables: Mutex<LruCache<TableKey, Arc<GradientTable>>>,
    hits: AtomicUsize,
    builds: AtomicUsize,
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TableCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Cache holding at most `capacity` tables (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            tables: Mutex::new(LruCache::new(capacity)),
            hits: AtomicUsize::new(0),
            builds: AtomicUsize::new(0),
        }
    }

    // Entries are only ever inserted whole, so a poisoned cache is still consistent.
    fn lock(&self) -> MutexGuard<'_, LruCache<TableKey, Arc<GradientTable>>> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Look up a table, marking it most recently used
    pub fn get(&self, key: &TableKey) -> Option<Arc<GradientTable>> {
        self.lock().get(key).cloned()
    }

    /// Look up a table without touching its recency
    pub fn peek(&self, key: &TableKey) -> Option<Arc<GradientTable>> {
        self.lock().peek(key).cloned()
    }

    /// Return the cached table for `key`, building it with `build` on a miss
    pub fn get_or_build<F>(&self, key: TableKey, build: F) -> Result<Arc<GradientTable>>
    where
        F: FnOnce() -> Result<GradientTable>,
    {
        if let Some(table) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(table);
        }

        let built = Arc::new(build()?);
        self.builds.fetch_add(1, Ordering::Relaxed);

        let mut tables = self.lock();
        if let Some(existing) = tables.get(&key) {
            trace!("table for spec {} built concurrently, reusing", key.spec_id);
            return Ok(Arc::clone(existing));
        }
        if let Some((evicted, _)) = tables.push(key, Arc::clone(&built)) {
            trace!("table cache full, evicted spec {}", evicted.spec_id);
        }
        Ok(built)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
        }
    }
}
