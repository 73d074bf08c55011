//! LRU cache for assembled routes.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use lru::LruCache;

use crate::engine::hops::Hop;
use crate::token::TokenIdentity;

pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 256;

/// Cache key for a route: identity keys of source and destination.
#[derive(Hash, PartialEq, Eq, Clone, Debug)]
pub struct RouteCacheKey {
    pub from_token: String,
    pub to_token: String,
}

impl RouteCacheKey {
    pub fn new(from: &TokenIdentity, to: &TokenIdentity) -> Self {
        Self {
            from_token: from.identity_key().to_string(),
            to_token: to.identity_key().to_string(),
        }
    }
}

/// Cached route: the hop list plus a printable form for logs.
#[derive(Clone, Debug)]
pub struct CachedRoute {
    pub hops: Vec<Hop>,
    pub printout: Vec<String>,
}

/// Snapshot of cache hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetrics {
    pub route_hits: usize,
    pub route_misses: usize,
    pub entries: usize,
}

pub struct RouteCache {
    pub routes: LruCache<RouteCacheKey, CachedRoute>,
    route_hits: AtomicUsize,
    route_misses: AtomicUsize,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ROUTE_CACHE_CAPACITY)
    }

    /// A zero capacity is bumped to one entry.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            routes: LruCache::new(capacity),
            route_hits: AtomicUsize::new(0),
            route_misses: AtomicUsize::new(0),
        }
    }

    pub fn get(&mut self, key: &RouteCacheKey) -> Option<&CachedRoute> {
        if let Some(route) = self.routes.get(key) {
            self.route_hits.fetch_add(1, Ordering::Relaxed);
            Some(route)
        } else {
            self.route_misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    pub fn insert(&mut self, key: RouteCacheKey, value: CachedRoute) {
        self.routes.put(key, value);
    }

    /// Drops every route that starts at, ends at or passes through `token`.
    pub fn invalidate_token(&mut self, token: &TokenIdentity) {
        let key = token.identity_key();
        let keys_to_remove: Vec<_> = self
            .routes
            .iter()
            .filter(|(k, v)| {
                k.from_token == key
                    || k.to_token == key
                    || v.hops.iter().any(|hop| hop.from_token.identity_key() == key)
            })
            .map(|(k, _)| k.clone())
            .collect();
        for k in keys_to_remove {
            self.routes.pop(&k);
        }
    }

    /// Drops every route that uses the pool at `pool_address`.
    pub fn invalidate_pool(&mut self, pool_address: &str) {
        let keys_to_remove: Vec<_> = self
            .routes
            .iter()
            .filter(|(_, v)| v.hops.iter().any(|hop| hop.pool_address == pool_address))
            .map(|(k, _)| k.clone())
            .collect();
        for k in keys_to_remove {
            self.routes.pop(&k);
        }
    }

    pub fn clear(&mut self) {
        self.routes.clear();
    }

    pub fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            route_hits: self.route_hits.load(Ordering::Relaxed),
            route_misses: self.route_misses.load(Ordering::Relaxed),
            entries: self.routes.len(),
        }
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}
