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

use serde::Serialize;
use stride_core::telemetry::{MetricId, MetricSet, MetricValue, MetricsSnapshot};

/// Counters of a single [`ResourcePool`](super::ResourcePool).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PoolStats {
    /// Name of the pool.
    pub name: String,
    /// Calls to `acquire`.
    pub requests: u64,
    /// Requests served from the free-list.
    pub hits: u64,
    /// Requests that constructed a new instance. Rejections are counted in
    /// `rejected` instead, so `hits + misses + rejected == requests`.
    pub misses: u64,
    /// Instances constructed, including pre-warming.
    pub created: u64,
    /// Instances dropped by the pool (full free-list, idle eviction, clear).
    pub destroyed: u64,
    /// Instances constructed past `max_size`.
    pub overflow_allocations: u64,
    /// Requests refused under `DropOnBusy`.
    pub rejected: u64,
    /// Releases of instances the pool did not recognize.
    pub unknown_releases: u64,
    /// In-use slots reclaimed through `forget`.
    pub forgotten: u64,
    /// Instances currently handed out.
    pub in_use: usize,
    /// Instances in the free-list.
    pub available: usize,
    /// Highest `in_use` observed.
    pub peak_in_use: usize,
    /// `hits / requests`, 0 before the first request.
    pub hit_rate: f64,
}

impl PoolStats {
    pub(crate) fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }
}

impl MetricsSnapshot for PoolStats {
    fn metrics(&self) -> Vec<(MetricId, MetricValue)> {
        MetricSet::new("pool")
            .with_label("pool", &self.name)
            .counter("requests", self.requests)
            .counter("hits", self.hits)
            .counter("misses", self.misses)
            .counter("created", self.created)
            .counter("destroyed", self.destroyed)
            .counter("overflow_allocations", self.overflow_allocations)
            .counter("rejected", self.rejected)
            .counter("unknown_releases", self.unknown_releases)
            .counter("forgotten", self.forgotten)
            .gauge("in_use", self.in_use as f64)
            .gauge("available", self.available as f64)
            .gauge("peak_in_use", self.peak_in_use as f64)
            .gauge("hit_rate", self.hit_rate)
            .build()
    }
}
