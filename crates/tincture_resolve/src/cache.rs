//! Resolution cache
//!
//! An explicit memo map, not a memoized closure: every entry is keyed by the
//! full composite signature `(token id, stack signature, scope, registry
//! version)`. Swapping the active stack or mutating the registry changes the
//! key, so stale entries simply stop being reachable; there is no background
//! eviction. Explicit pattern invalidation exists for targeted refreshes
//! (`color-*` after a palette edit).
//!
//! `put` is idempotent: the cached value is a pure function of the key, so
//! concurrent puts for the same key are safe to race.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use rustc_hash::FxHashMap;

use tincture_core::ResolvedToken;

/// Composite cache key
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub token_id: String,
    pub stack_signature: u64,
    pub scope: String,
    pub registry_version: u64,
}

impl CacheKey {
    pub fn new(token_id: &str, stack_signature: u64, scope: &str, registry_version: u64) -> Self {
        Self {
            token_id: token_id.to_string(),
            stack_signature,
            scope: scope.to_string(),
            registry_version,
        }
    }
}

/// Hit/miss counters for diagnostics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Memo map in front of the scope resolver
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<FxHashMap<CacheKey, ResolvedToken>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<ResolvedToken> {
        let entries = self.entries.read().expect("cache lock poisoned");
        match entries.get(key) {
            Some(resolved) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(resolved.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert a resolution; an existing entry for the key is kept as-is
    pub fn put(&self, key: CacheKey, resolved: ResolvedToken) {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.entry(key).or_insert(resolved);
    }

    /// Evict entries, returning how many were removed
    ///
    /// `None` clears everything. A pattern matches token ids exactly, or by
    /// prefix with a trailing `*` (`color-*`).
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        let before = entries.len();
        match pattern {
            None => entries.clear(),
            Some(pattern) => {
                entries.retain(|key, _| !pattern_matches(pattern, &key.token_id));
            }
        }
        let evicted = before - entries.len();
        tracing::debug!(?pattern, evicted, "cache invalidation");
        evicted
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().expect("cache lock poisoned").len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn pattern_matches(pattern: &str, token_id: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => token_id.starts_with(prefix),
        None => token_id == pattern,
    }
}
