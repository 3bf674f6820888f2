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

use super::stats::PoolStats;
use ahash::AHashSet;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use stride_core::config::{ExhaustionPolicy, PoolConfig};

/// Source of pool identities, so ids from one pool never match another.
static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// A type that can be returned to a pool and reused.
pub trait Poolable {
    /// Restores the instance to a freshly-constructed state.
    fn reset(&mut self);
}

/// Identity of a pooled instance: the owning pool plus a per-pool sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId {
    pool: u64,
    index: u64,
}

impl EntryId {
    /// Sequence number of the instance within its pool.
    pub fn index(&self) -> u64 {
        self.index
    }
}

/// An instance handed out by [`ResourcePool::acquire`].
///
/// Must be handed back with [`ResourcePool::release`]. Dropping it instead
/// leaves its slot counted as in use until [`ResourcePool::forget`] is called
/// with its id.
#[derive(Debug)]
#[must_use = "a pooled instance stays counted as in use until it is released"]
pub struct Pooled<T> {
    id: EntryId,
    value: T,
    overflow: bool,
}

impl<T> Pooled<T> {
    /// Identity used by the pool to recognize this instance on release.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// `true` if the instance was allocated past the pool's maximum.
    pub fn is_overflow(&self) -> bool {
        self.overflow
    }
}

impl<T> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

/// A free-list entry.
struct PoolEntry<T> {
    id: EntryId,
    value: T,
    last_released: Instant,
}

type Factory<T> = Box<dyn FnMut() -> T>;
type Reset<T> = Box<dyn FnMut(&mut T)>;

/// A bounded, pre-warmed free-list of reusable `T` instances.
pub struct ResourcePool<T> {
    name: String,
    config: PoolConfig,
    pool_id: u64,
    next_index: u64,
    factory: Factory<T>,
    reset: Option<Reset<T>>,
    available: Vec<PoolEntry<T>>,
    in_use: AHashSet<EntryId>,
    exhausted: bool,
    stats: PoolStats,
}

impl<T> ResourcePool<T> {
    /// Creates a pool and pre-warms it with `config.prewarm` instances.
    pub fn new(
        name: impl Into<String>,
        config: PoolConfig,
        factory: impl FnMut() -> T + 'static,
    ) -> Self {
        let name = name.into();
        let mut pool = Self {
            stats: PoolStats::named(&name),
            name,
            pool_id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            next_index: 0,
            factory: Box::new(factory),
            reset: None,
            available: Vec::with_capacity(config.max_size),
            in_use: AHashSet::with_capacity(config.max_size),
            exhausted: false,
            config,
        };
        let warmed = pool.warm(pool.config.prewarm);
        log::debug!(
            "ResourcePool '{}': pre-warmed {} instances (max {}, {:?})",
            pool.name,
            warmed,
            pool.config.max_size,
            pool.config.policy
        );
        pool
    }

    /// Sets the function applied to an instance on acquire from the free-list and on release.
    pub fn with_reset(mut self, reset: impl FnMut(&mut T) + 'static) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Hands out an instance.
    ///
    /// Served from the free-list when possible (a hit). Otherwise a new
    /// instance is constructed (a miss). When `max_size` instances are
    /// already in use the exhaustion policy decides: `OverAllocate` still
    /// constructs one, `DropOnBusy` returns `None` and counts a rejection
    /// rather than a miss.
    ///
    /// Every instance handed out occupies an in-use slot until it is passed to
    /// [`release`](Self::release) or its id to [`forget`](Self::forget). Under
    /// `DropOnBusy`, `max_size` handles dropped without either leave the pool
    /// refusing every request once the free-list is empty.
    pub fn acquire(&mut self) -> Option<Pooled<T>> {
        self.stats.requests += 1;

        if let Some(mut entry) = self.available.pop() {
            self.stats.hits += 1;
            if let Some(reset) = self.reset.as_mut() {
                reset(&mut entry.value);
            }
            self.mark_in_use(entry.id);
            return Some(Pooled {
                id: entry.id,
                value: entry.value,
                overflow: false,
            });
        }

        let overflow = self.in_use.len() >= self.config.max_size;
        if overflow {
            if !self.exhausted {
                log::warn!(
                    "ResourcePool '{}': exhausted at {} in use ({:?})",
                    self.name,
                    self.in_use.len(),
                    self.config.policy
                );
                self.exhausted = true;
            }
            match self.config.policy {
                ExhaustionPolicy::DropOnBusy => {
                    self.stats.rejected += 1;
                    return None;
                }
                ExhaustionPolicy::OverAllocate => self.stats.overflow_allocations += 1,
            }
        }

        self.stats.misses += 1;
        let id = self.next_id();
        let value = (self.factory)();
        self.stats.created += 1;
        self.mark_in_use(id);
        Some(Pooled {
            id,
            value,
            overflow,
        })
    }

    /// Takes an instance back.
    ///
    /// Instances this pool did not hand out, or already took back, are
    /// dropped without touching the free-list.
    pub fn release(&mut self, pooled: Pooled<T>) {
        if !self.in_use.remove(&pooled.id) {
            self.stats.unknown_releases += 1;
            log::debug!(
                "ResourcePool '{}': ignoring release of unknown instance {:?}",
                self.name,
                pooled.id
            );
            return;
        }
        if self.in_use.len() < self.config.max_size {
            self.exhausted = false;
        }

        let Pooled { id, mut value, .. } = pooled;
        if let Some(reset) = self.reset.as_mut() {
            reset(&mut value);
        }

        if self.available.len() < self.config.max_size {
            self.available.push(PoolEntry {
                id,
                value,
                last_released: Instant::now(),
            });
        } else {
            self.stats.destroyed += 1;
        }
    }

    /// Gives up on an instance that will never be released, freeing its slot.
    ///
    /// The instance counts as destroyed. Returns `false` if `id` is not
    /// currently in use.
    pub fn forget(&mut self, id: EntryId) -> bool {
        if !self.in_use.remove(&id) {
            return false;
        }
        self.stats.forgotten += 1;
        self.stats.destroyed += 1;
        if self.in_use.len() < self.config.max_size {
            self.exhausted = false;
        }
        log::warn!(
            "ResourcePool '{}': forgot leaked instance {:?} ({} still in use)",
            self.name,
            id,
            self.in_use.len()
        );
        true
    }

    /// Tops the free-list up with up to `count` new instances, never past `max_size`.
    ///
    /// Returns how many were constructed.
    pub fn warm(&mut self, count: usize) -> usize {
        let room = self.config.max_size.saturating_sub(self.available.len());
        let count = count.min(room);
        let now = Instant::now();
        for _ in 0..count {
            let id = self.next_id();
            let value = (self.factory)();
            self.available.push(PoolEntry {
                id,
                value,
                last_released: now,
            });
        }
        self.stats.created += count as u64;
        count
    }

    /// Evicts free-list entries idle longer than the configured timeout.
    pub fn cleanup(&mut self) -> usize {
        self.cleanup_at(Instant::now())
    }

    /// Evicts free-list entries idle longer than the configured timeout, as of `now`.
    pub fn cleanup_at(&mut self, now: Instant) -> usize {
        let timeout = self.config.idle_timeout();
        let before = self.available.len();
        self.available
            .retain(|entry| now.saturating_duration_since(entry.last_released) <= timeout);
        let evicted = before - self.available.len();
        if evicted > 0 {
            self.stats.destroyed += evicted as u64;
            log::debug!(
                "ResourcePool '{}': evicted {} idle instances",
                self.name,
                evicted
            );
        }
        evicted
    }

    /// Drops the whole free-list. Instances currently handed out are unaffected.
    pub fn clear(&mut self) {
        self.stats.destroyed += self.available.len() as u64;
        self.available.clear();
    }

    /// Name the pool was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Instances currently handed out.
    pub fn in_use(&self) -> usize {
        self.in_use.len()
    }

    /// Instances waiting in the free-list.
    pub fn available(&self) -> usize {
        self.available.len()
    }

    /// Takes a snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        let mut stats = self.stats.clone();
        stats.in_use = self.in_use.len();
        stats.available = self.available.len();
        stats.hit_rate = if stats.requests == 0 {
            0.0
        } else {
            stats.hits as f64 / stats.requests as f64
        };
        stats
    }

    fn next_id(&mut self) -> EntryId {
        let id = EntryId {
            pool: self.pool_id,
            index: self.next_index,
        };
        self.next_index += 1;
        id
    }

    fn mark_in_use(&mut self, id: EntryId) {
        self.in_use.insert(id);
        self.stats.peak_in_use = self.stats.peak_in_use.max(self.in_use.len());
    }
}

impl<T: Poolable + Default + 'static> ResourcePool<T> {
    /// Creates a pool of a [`Poolable`] type, constructed with `Default`.
    pub fn poolable(name: impl Into<String>, config: PoolConfig) -> Self {
        Self::new(name, config, T::default).with_reset(T::reset)
    }
}

impl<T> fmt::Debug for ResourcePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("in_use", &self.in_use.len())
            .field("available", &self.available.len())
            .finish()
    }
}
