pub mod assembler;
pub mod hops;
pub mod path;

use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::data_management::cache::{CacheMetrics, CachedRoute, RouteCache, RouteCacheKey};
use crate::pair::Pair;
use crate::token::TokenIdentity;
use crate::types::Result;
use assembler::{Assembler, AssemblerConfig};
use hops::{into_hops, printout, Hop};
use path::PathNode;

/// Pair list plus a counter bumped on every replacement.
struct PairSnapshot {
    generation: u64,
    pairs: Arc<Vec<Pair>>,
}

/// Shared entry point for repeated route lookups over one pair snapshot.
///
/// Each lookup runs a fresh [`Assembler`] over an immutable snapshot of the
/// pairs, so concurrent lookups never contend on anything but the cache.
/// A route is only cached if the snapshot it was built from is still current.
#[derive(Clone)]
pub struct RoutePlanner {
    snapshot: Arc<RwLock<PairSnapshot>>,
    pub cache: Arc<RwLock<RouteCache>>,
    pub assembler_config: AssemblerConfig,
}

impl PairSnapshot {
    fn replace(&mut self, pairs: Vec<Pair>) -> u64 {
        self.generation += 1;
        self.pairs = Arc::new(pairs);
        self.generation
    }
}

impl RoutePlanner {
    pub fn new(pairs: Vec<Pair>) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(PairSnapshot {
                generation: 0,
                pairs: Arc::new(pairs),
            })),
            cache: Arc::new(RwLock::new(RouteCache::new())),
            assembler_config: AssemblerConfig::default(),
        }
    }

    pub fn from_config(pairs: Vec<Pair>, config: &AppConfig) -> Self {
        info!(
            pairs = pairs.len(),
            max_hops = ?config.max_hops,
            cache_capacity = config.cache_capacity,
            "Initialising route planner"
        );
        Self {
            snapshot: Arc::new(RwLock::new(PairSnapshot {
                generation: 0,
                pairs: Arc::new(pairs),
            })),
            cache: Arc::new(RwLock::new(RouteCache::with_capacity(config.cache_capacity))),
            assembler_config: config.assembler_config(),
        }
    }

    /// Current pair snapshot.
    pub fn pairs(&self) -> Arc<Vec<Pair>> {
        self.current().1
    }

    /// Swaps in a new pair snapshot and drops every cached route.
    pub fn replace_pairs(&self, pairs: Vec<Pair>) {
        let count = pairs.len();
        let generation = match self.snapshot.write() {
            Ok(mut guard) => guard.replace(pairs),
            Err(poisoned) => poisoned.into_inner().replace(pairs),
        };
        self.with_cache(|cache| cache.clear());
        info!(pairs = count, generation, "Pair snapshot replaced, route cache cleared");
    }

    /// Best path tree for the request. Not cached.
    pub fn route_tree(&self, from: &TokenIdentity, to: &TokenIdentity) -> Result<PathNode> {
        let (_, pairs) = self.current();
        self.assemble(&pairs, from, to)
    }

    /// Router-ready hop list for the request, served from cache when possible.
    pub fn route(&self, from: &TokenIdentity, to: &TokenIdentity) -> Result<Vec<Hop>> {
        self.route_entry(from, to).map(|entry| entry.hops)
    }

    /// Hop list together with its `A -> B` printout.
    pub fn route_entry(&self, from: &TokenIdentity, to: &TokenIdentity) -> Result<CachedRoute> {
        let key = RouteCacheKey::new(from, to);
        if let Some(entry) = self.with_cache(|cache| cache.get(&key).cloned()) {
            debug!(from = %from, to = %to, "Route cache hit");
            return Ok(entry);
        }

        let (generation, pairs) = self.current();
        let tree = self.assemble(&pairs, from, to)?;
        let entry = CachedRoute {
            hops: into_hops(&tree)?,
            printout: printout(&tree),
        };
        debug!(from = %from, to = %to, route = %entry.printout.join(", "), "Route assembled");
        // checked under the cache lock so a concurrent replace_pairs either
        // clears this entry afterwards or is seen here
        self.with_cache(|cache| {
            if self.current().0 == generation {
                cache.insert(key, entry.clone());
            } else {
                debug!(from = %from, to = %to, "Pair snapshot replaced during search, not caching");
            }
        });
        Ok(entry)
    }

    pub fn cache_metrics(&self) -> CacheMetrics {
        self.with_cache(|cache| cache.metrics())
    }

    fn current(&self) -> (u64, Arc<Vec<Pair>>) {
        match self.snapshot.read() {
            Ok(guard) => (guard.generation, Arc::clone(&guard.pairs)),
            Err(poisoned) => {
                let guard = poisoned.into_inner();
                (guard.generation, Arc::clone(&guard.pairs))
            }
        }
    }

    fn assemble(&self, pairs: &[Pair], from: &TokenIdentity, to: &TokenIdentity) -> Result<PathNode> {
        let mut assembler = Assembler::with_config(pairs, &self.assembler_config);
        assembler.from(from.clone()).to(to.clone())?;
        assembler.get_tree()
    }

    fn with_cache<T>(&self, f: impl FnOnce(&mut RouteCache) -> T) -> T {
        match self.cache.write() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}
