// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Named, type-erased collection of resource pools.

use super::resource_pool::ResourcePool;
use super::stats::PoolStats;
use ahash::AHashMap;
use std::any::Any;
use std::time::Instant;
use stride_core::config::PoolConfig;

/// Object-safe view of a [`ResourcePool`] of any element type.
pub trait ErasedPool: Any {
    /// Name the pool was registered under.
    fn name(&self) -> &str;

    /// Snapshot of the pool counters.
    fn stats(&self) -> PoolStats;

    /// Evicts idle free-list entries as of `now`. Returns how many were evicted.
    fn cleanup_at(&mut self, now: Instant) -> usize;

    /// Drops the free-list.
    fn clear(&mut self);

    /// Name of the pooled element type, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Returns a reference to the concrete pool as `Any`.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to the concrete pool as `Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedPool for ResourcePool<T> {
    fn name(&self) -> &str {
        ResourcePool::name(self)
    }

    fn stats(&self) -> PoolStats {
        ResourcePool::stats(self)
    }

    fn cleanup_at(&mut self, now: Instant) -> usize {
        ResourcePool::cleanup_at(self, now)
    }

    fn clear(&mut self) {
        ResourcePool::clear(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Registry of pools addressed by name.
///
/// Typed access goes through [`get`](Self::get) and [`get_mut`](Self::get_mut),
/// which return `None` both for unknown names and for a mismatched element type.
pub struct PoolRegistry {
    pools: AHashMap<String, Box<dyn ErasedPool>>,
    defaults: PoolConfig,
}

impl PoolRegistry {
    /// Creates an empty registry using the built-in pool defaults.
    pub fn new() -> Self {
        Self::with_defaults(PoolConfig::default())
    }

    /// Creates an empty registry whose [`create`](Self::create) uses `defaults`.
    pub fn with_defaults(defaults: PoolConfig) -> Self {
        Self {
            pools: AHashMap::new(),
            defaults,
        }
    }

    /// Config applied by [`create`](Self::create).
    pub fn defaults(&self) -> &PoolConfig {
        &self.defaults
    }

    /// Registers a pool under its own name, replacing any pool of the same name.
    pub fn register<T: 'static>(&mut self, pool: ResourcePool<T>) {
        let name = pool.name().to_owned();
        log::info!(
            "PoolRegistry: Registered '{}' ({}, max={})",
            name,
            std::any::type_name::<T>(),
            pool.config().max_size
        );
        if let Some(previous) = self.pools.insert(name.clone(), Box::new(pool)) {
            log::warn!(
                "PoolRegistry: '{}' replaced an existing pool of {}",
                name,
                previous.type_name()
            );
        }
    }

    /// Creates and registers a pool with the registry defaults.
    pub fn create<T: 'static>(
        &mut self,
        name: impl Into<String>,
        factory: impl FnMut() -> T + 'static,
    ) -> &mut ResourcePool<T> {
        let name = name.into();
        let pool = ResourcePool::new(name.clone(), self.defaults.clone(), factory);
        self.register(pool);
        self.pools
            .get_mut(&name)
            .and_then(|pool| pool.as_any_mut().downcast_mut::<ResourcePool<T>>())
            .unwrap_or_else(|| unreachable!("pool '{name}' was just registered"))
    }

    /// Returns the pool named `name` if it holds `T`.
    pub fn get<T: 'static>(&self, name: &str) -> Option<&ResourcePool<T>> {
        let Some(pool) = self.pools.get(name) else {
            log::debug!("PoolRegistry: no pool named '{}'", name);
            return None;
        };
        let typed = pool.as_any().downcast_ref::<ResourcePool<T>>();
        if typed.is_none() {
            log::warn!(
                "PoolRegistry: '{}' holds {}, not {}",
                name,
                pool.type_name(),
                std::any::type_name::<T>()
            );
        }
        typed
    }

    /// Returns the pool named `name` mutably if it holds `T`.
    pub fn get_mut<T: 'static>(&mut self, name: &str) -> Option<&mut ResourcePool<T>> {
        let Some(pool) = self.pools.get_mut(name) else {
            log::debug!("PoolRegistry: no pool named '{}'", name);
            return None;
        };
        let held = pool.type_name();
        let typed = pool.as_any_mut().downcast_mut::<ResourcePool<T>>();
        if typed.is_none() {
            log::warn!(
                "PoolRegistry: '{}' holds {}, not {}",
                name,
                held,
                std::any::type_name::<T>()
            );
        }
        typed
    }

    /// Returns true if a pool named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.pools.contains_key(name)
    }

    /// Unregisters a pool, dropping its free-list. Returns false if it was unknown.
    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.pools.remove(name).is_some();
        if removed {
            log::info!("PoolRegistry: Removed '{}'", name);
        }
        removed
    }

    /// Names of all registered pools, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered pools.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Returns true if no pools are registered.
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Runs idle eviction on every pool. Returns the total number evicted.
    pub fn cleanup_all(&mut self) -> usize {
        self.cleanup_all_at(Instant::now())
    }

    /// Runs idle eviction on every pool as of `now`.
    pub fn cleanup_all_at(&mut self, now: Instant) -> usize {
        self.pools
            .values_mut()
            .map(|pool| pool.cleanup_at(now))
            .sum()
    }

    /// Snapshots every pool, sorted by name.
    pub fn stats(&self) -> Vec<PoolStats> {
        let mut stats: Vec<PoolStats> = self.pools.values().map(|pool| pool.stats()).collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }

    /// Drops the free-list of every pool. Pools stay registered.
    pub fn clear_all(&mut self) {
        for pool in self.pools.values_mut() {
            pool.clear();
        }
    }
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PoolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("pools", &self.names())
            .field("defaults", &self.defaults)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, Default, PartialEq)]
    struct Bullet {
        velocity: f32,
    }

    #[test]
    fn test_create_and_typed_access() {
        let mut registry = PoolRegistry::with_defaults(PoolConfig::sized(2, 8));
        registry.create("bullets", Bullet::default);

        let pool = registry.get_mut::<Bullet>("bullets").unwrap();
        let bullet = pool.acquire().unwrap();
        pool.release(bullet);

        let stats = registry.get::<Bullet>("bullets").unwrap().stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.available, 2);
    }

    #[test]
    fn test_type_mismatch_returns_none() {
        let mut registry = PoolRegistry::new();
        registry.create("bullets", Bullet::default);
        assert!(registry.get::<String>("bullets").is_none());
        assert!(registry.get_mut::<String>("bullets").is_none());
        assert!(registry.get::<Bullet>("missing").is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = PoolRegistry::new();
        registry.register(ResourcePool::new("fx", PoolConfig::sized(1, 4), || 0u32));
        registry.register(ResourcePool::new("fx", PoolConfig::sized(1, 4), String::new));
        assert_eq!(registry.len(), 1);
        assert!(registry.get::<String>("fx").is_some());
    }

    #[test]
    fn test_names_and_stats_are_sorted() {
        let mut registry = PoolRegistry::with_defaults(PoolConfig::sized(0, 4));
        registry.create("sparks", || 0u8);
        registry.create("bullets", Bullet::default);
        assert_eq!(registry.names(), vec!["bullets", "sparks"]);
        let names: Vec<_> = registry.stats().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["bullets", "sparks"]);
    }

    #[test]
    fn test_cleanup_all_and_remove() {
        let defaults = PoolConfig::sized(3, 8).with_idle_timeout(Duration::from_secs(1));
        let mut registry = PoolRegistry::with_defaults(defaults);
        registry.create("a", || 0u8);
        registry.create("b", || 0u16);

        let later = Instant::now() + Duration::from_secs(2);
        assert_eq!(registry.cleanup_all_at(later), 6);

        assert!(registry.remove("a"));
        assert!(!registry.remove("a"));
        assert!(!registry.contains("a"));
        assert!(registry.contains("b"));
    }

    #[test]
    fn test_clear_all_keeps_pools_registered() {
        let mut registry = PoolRegistry::with_defaults(PoolConfig::sized(4, 8));
        registry.create("a", || 0u8);
        registry.clear_all();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.stats()[0].available, 0);
    }
}
