// src/gateway/cache.rs

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

/// Cached gateway result
struct CacheEntry {
    value: Value,
    inserted_at: Instant,
}

/// Response cache with TTL and lazy expiry.
///
/// Keys are opaque strings built by the gateway client from the operation
/// name and its canonicalized parameters. Only successful results are ever
/// stored, so a transient failure does not poison later identical calls.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Get a cached value if still fresh. An entry older than the TTL is
    /// deleted and treated as a miss; there is no background sweep.
    pub fn get(&self, key: &str) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            drop(entry); // Release read lock before removing
            self.entries.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn set(&self, key: String, value: Value) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn evict(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
