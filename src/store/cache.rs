//! Query cache with hierarchical keys.
//!
//! Keys form a fixed hierarchy: `entity` → `(entity, list, filters)` →
//! `(entity, detail, id)`. List keys embed the canonicalized filter JSON so
//! two different filter combinations never collide. Entries expire for
//! freshness (per-entity window) and are garbage-collected after the cache
//! lifetime by [`QueryCache::sweep`].
//!
//! Concurrent refetches race and the last write wins; that mirrors the
//! behavior being replicated and is a known limitation, not a guarantee.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

/// Freshness window for volatile views (notifications, dashboard).
pub const VOLATILE_FRESHNESS: Duration = Duration::from_secs(45);
/// Default freshness window for entity lists.
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(120);
/// Freshness window for slow-moving reference data.
pub const REFERENCE_FRESHNESS: Duration = Duration::from_secs(600);

/// How long an entry may sit unused before `sweep` drops it.
const CACHE_LIFETIME: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyKind {
    List(String),
    Detail(String),
}

/// A fully-qualified cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    entity: &'static str,
    kind: KeyKind,
}

impl CacheKey {
    /// List key for an entity + filter object. The filter serializes to its
    /// canonical JSON string; distinct filters yield distinct keys.
    pub fn list<F: Serialize>(entity: &'static str, filters: &F) -> Self {
        let canonical = serde_json::to_string(filters).unwrap_or_else(|_| "{}".to_string());
        CacheKey {
            entity,
            kind: KeyKind::List(canonical),
        }
    }

    /// Detail key for an entity + id.
    pub fn detail(entity: &'static str, id: &str) -> Self {
        CacheKey {
            entity,
            kind: KeyKind::Detail(id.to_string()),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, KeyKind::List(_))
    }
}

struct CacheEntry {
    value: Value,
    fetched_at: Instant,
    fresh_for: Duration,
}

/// Concurrent query cache shared by every resource store in a process.
pub struct QueryCache {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl QueryCache {
    pub fn new() -> Self {
        QueryCache {
            entries: DashMap::new(),
        }
    }

    /// Return the cached value if it is still inside its freshness window.
    pub fn get_fresh(&self, key: &CacheKey) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.fetched_at.elapsed() < entry.fresh_for {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn put(&self, key: CacheKey, value: Value, fresh_for: Duration) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
                fresh_for,
            },
        );
    }

    /// Store a detail entry directly (the update-mutation path: the server's
    /// returned object becomes the cached truth).
    pub fn put_detail(&self, entity: &'static str, id: &str, value: Value, fresh_for: Duration) {
        self.put(CacheKey::detail(entity, id), value, fresh_for);
    }

    /// Drop every list entry under an entity namespace, forcing the next
    /// list read to refetch.
    pub fn invalidate_lists(&self, entity: &str) {
        self.entries
            .retain(|key, _| !(key.entity == entity && key.is_list()));
    }

    /// Drop everything under an entity namespace.
    pub fn invalidate_entity(&self, entity: &str) {
        self.entries.retain(|key, _| key.entity != entity);
    }

    /// Evict one detail entry (the delete-mutation path).
    pub fn remove_detail(&self, entity: &'static str, id: &str) {
        self.entries.remove(&CacheKey::detail(entity, id));
    }

    /// Drop entries older than the cache lifetime. The implicit collection
    /// of unused queries; there is no per-query cancellation.
    pub fn sweep(&self) {
        self.entries
            .retain(|_, entry| entry.fetched_at.elapsed() < CACHE_LIFETIME);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
