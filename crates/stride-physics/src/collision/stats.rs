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

/// Counters of a [`CollisionResolver`](super::CollisionResolver).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CollisionStats {
    /// Trackers currently held.
    pub active_trackers: usize,
    /// Identifiers in the recently-scored ring.
    pub recent_scores: usize,
    /// Identifiers in the recently-damaged ring.
    pub recent_damage: usize,
    /// Position samples processed.
    pub resolutions: u64,
    /// State changes observed across all trackers.
    pub state_changes: u64,
    /// Scores authorized.
    pub scores_granted: u64,
    /// Damage events authorized.
    pub damage_granted: u64,
    /// Authorizations refused because the outcome was already taken.
    pub duplicates_rejected: u64,
    /// Trackers created on first observation.
    pub trackers_created: u64,
    /// Trackers removed by the staleness sweep.
    pub trackers_evicted: u64,
    /// Staleness sweeps run.
    pub cleanup_passes: u64,
    /// Ticks advanced.
    pub ticks: u64,
}

impl MetricsSnapshot for CollisionStats {
    fn metrics(&self) -> Vec<(MetricId, MetricValue)> {
        MetricSet::new("collision")
            .gauge("active_trackers", self.active_trackers as f64)
            .gauge("recent_scores", self.recent_scores as f64)
            .gauge("recent_damage", self.recent_damage as f64)
            .counter("resolutions", self.resolutions)
            .counter("state_changes", self.state_changes)
            .counter("scores_granted", self.scores_granted)
            .counter("damage_granted", self.damage_granted)
            .counter("duplicates_rejected", self.duplicates_rejected)
            .counter("trackers_created", self.trackers_created)
            .counter("trackers_evicted", self.trackers_evicted)
            .counter("cleanup_passes", self.cleanup_passes)
            .counter("ticks", self.ticks)
            .build()
    }
}
