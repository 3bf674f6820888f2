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

//! The collision resolver: one tracker per obstacle plus two rings of
//! recently-finalized identifiers.
//!
//! A score or damage outcome is authorized at most once per obstacle. The
//! tracker flags are the first guard; the rings are a second guard that
//! survives tracker removal, so an obstacle that is despawned and observed
//! again under the same identifier cannot be credited twice.

use super::state::{CollisionState, ObjectId, ObstacleSpan};
use super::stats::CollisionStats;
use super::tracker::CollisionTracker;
use ahash::AHashMap;
use std::time::Duration;
use stride_core::collections::RingBuffer;
use stride_core::config::CollisionConfig;

/// Capacity of each recently-finalized ring.
pub const RECENT_CAPACITY: usize = 50;

/// Per-obstacle collision state machine with exactly-once outcome authorization.
#[derive(Debug)]
pub struct CollisionResolver {
    config: CollisionConfig,
    trackers: AHashMap<ObjectId, CollisionTracker>,
    recent_scores: RingBuffer<ObjectId, RECENT_CAPACITY>,
    recent_damage: RingBuffer<ObjectId, RECENT_CAPACITY>,
    clock: Duration,
    ticks: u64,
    stats: CollisionStats,
}

impl CollisionResolver {
    /// Creates an empty resolver.
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            config,
            trackers: AHashMap::new(),
            recent_scores: RingBuffer::new(),
            recent_damage: RingBuffer::new(),
            clock: Duration::ZERO,
            ticks: 0,
            stats: CollisionStats::default(),
        }
    }

    /// Feeds one position sample for an obstacle and returns its new state.
    ///
    /// `object_position` is the obstacle's leading edge and `object_span` its
    /// width. The tracker is created on first observation. Non-finite input is
    /// ignored and the current state returned unchanged.
    pub fn resolve_collision(
        &mut self,
        id: impl Into<ObjectId>,
        object_position: f32,
        object_span: f32,
        player_position: f32,
    ) -> CollisionState {
        let id = id.into();
        let span = ObstacleSpan::new(object_position, object_span);
        if !span.is_finite() || !player_position.is_finite() {
            log::debug!(
                "CollisionResolver: ignoring non-finite sample for '{}' (obstacle {:?}, player {})",
                id,
                span,
                player_position
            );
            return self.state(id.as_str());
        }

        let now = self.clock;
        let tick = self.ticks;
        let zone_width = self.config.zone_width;
        let created = &mut self.stats.trackers_created;
        let tracker = self.trackers.entry(id).or_insert_with_key(|id| {
            *created += 1;
            log::trace!("CollisionResolver: tracking '{}'", id);
            CollisionTracker::new(id.clone(), now)
        });

        let previous = tracker.state();
        self.stats.resolutions += 1;
        if tracker.observe(span, player_position, zone_width, now, tick) {
            self.stats.state_changes += 1;
            log::trace!(
                "CollisionResolver: '{}' {} -> {}",
                tracker.id(),
                previous,
                tracker.state()
            );
        }
        tracker.state()
    }

    /// Authorizes the obstacle's score, at most once.
    ///
    /// Requires a tracker in `Passed` or `Approaching` that has been observed
    /// more than `score_debounce_frames` times, engaged for more than
    /// `score_settle_frames` consecutive samples, and whose identifier has not
    /// scored recently.
    pub fn try_score(&mut self, id: &str) -> bool {
        let debounce = self.config.score_debounce_frames;
        let settle = self.config.score_settle_frames;
        let Some(tracker) = self.trackers.get_mut(id) else {
            return false;
        };
        if tracker.scored() || Self::recently(&self.recent_scores, id) {
            self.stats.duplicates_rejected += 1;
            log::debug!("CollisionResolver: duplicate score for '{}' rejected", id);
            return false;
        }
        if !tracker.state().can_score()
            || tracker.observations() <= debounce
            || tracker.engaged_observations() <= settle
        {
            return false;
        }

        tracker.mark_scored();
        self.recent_scores.push(tracker.id().clone());
        self.stats.scores_granted += 1;
        log::debug!(
            "CollisionResolver: score granted for '{}' ({})",
            id,
            tracker.state()
        );
        true
    }

    /// Authorizes the obstacle's damage, at most once.
    ///
    /// Requires a `Colliding` tracker observed more than
    /// `damage_debounce_frames` times whose identifier has not dealt damage
    /// recently.
    pub fn try_damage(&mut self, id: &str) -> bool {
        let debounce = self.config.damage_debounce_frames;
        let Some(tracker) = self.trackers.get_mut(id) else {
            return false;
        };
        if tracker.damaged() || Self::recently(&self.recent_damage, id) {
            self.stats.duplicates_rejected += 1;
            log::debug!("CollisionResolver: duplicate damage for '{}' rejected", id);
            return false;
        }
        if tracker.state() != CollisionState::Colliding || tracker.observations() <= debounce {
            return false;
        }

        tracker.mark_damaged();
        self.recent_damage.push(tracker.id().clone());
        self.stats.damage_granted += 1;
        log::debug!("CollisionResolver: damage granted for '{}'", id);
        true
    }

    /// Advances the resolver clock by one frame.
    ///
    /// The staleness sweep runs every `cleanup_interval_ticks` ticks.
    pub fn tick(&mut self, dt: Duration) {
        self.clock = self.clock.saturating_add(dt);
        self.ticks += 1;
        if self.ticks % self.config.cleanup_interval_ticks.max(1) == 0 {
            self.cleanup();
        }
    }

    /// Evicts stale trackers now. Returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock;
        let stale_after = self.config.stale_after();
        let grace = self.config.processed_grace();

        let before = self.trackers.len();
        self.trackers
            .retain(|_, tracker| !tracker.is_stale(now, stale_after, grace));
        let evicted = before - self.trackers.len();

        self.stats.cleanup_passes += 1;
        self.stats.trackers_evicted += evicted as u64;
        if evicted > 0 {
            log::debug!(
                "CollisionResolver: evicted {} stale trackers ({} remain)",
                evicted,
                self.trackers.len()
            );
        }
        evicted
    }

    /// Current state of an obstacle; `None` if it is not tracked.
    pub fn state(&self, id: &str) -> CollisionState {
        self.trackers
            .get(id)
            .map(CollisionTracker::state)
            .unwrap_or_default()
    }

    /// Whether the obstacle's score was authorized; `false` if it is not tracked.
    pub fn has_scored(&self, id: &str) -> bool {
        self.trackers.get(id).is_some_and(CollisionTracker::scored)
    }

    /// Whether the obstacle's damage was authorized; `false` if it is not tracked.
    pub fn has_damaged(&self, id: &str) -> bool {
        self.trackers.get(id).is_some_and(CollisionTracker::damaged)
    }

    /// The tracker of an obstacle, if it is tracked.
    pub fn tracker(&self, id: &str) -> Option<&CollisionTracker> {
        self.trackers.get(id)
    }

    /// Ticks since the obstacle was last observed, if it is tracked.
    pub fn ticks_since_update(&self, id: &str) -> Option<u64> {
        self.trackers
            .get(id)
            .map(|tracker| self.ticks.saturating_sub(tracker.last_seen_tick()))
    }

    /// Drops an obstacle's tracker. The recently-finalized rings keep their entries.
    pub fn remove_tracker(&mut self, id: &str) -> bool {
        self.trackers.remove(id).is_some()
    }

    /// Drops every tracker and empties both rings.
    pub fn clear_all(&mut self) {
        let dropped = self.trackers.len();
        self.trackers.clear();
        self.recent_scores.clear();
        self.recent_damage.clear();
        log::debug!("CollisionResolver: cleared {} trackers", dropped);
    }

    /// Number of tracked obstacles.
    pub fn tracker_count(&self) -> usize {
        self.trackers.len()
    }

    /// Resolver clock, the sum of every `dt` passed to [`tick`](Self::tick).
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// The active configuration.
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Takes a snapshot of the resolver counters.
    pub fn stats(&self) -> CollisionStats {
        CollisionStats {
            active_trackers: self.trackers.len(),
            recent_scores: self.recent_scores.count(),
            recent_damage: self.recent_damage.count(),
            ticks: self.ticks,
            ..self.stats
        }
    }

    fn recently(ring: &RingBuffer<ObjectId, RECENT_CAPACITY>, id: &str) -> bool {
        ring.iter().any(|recent| recent.as_str() == id)
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    /// Obstacle from 100 to 120, zones of 120 on either side.
    fn step(resolver: &mut CollisionResolver, id: &str, player: f32) -> CollisionState {
        let state = resolver.resolve_collision(id, 100.0, 20.0, player);
        resolver.tick(FRAME);
        state
    }

    #[test]
    fn test_full_pass_sequence() {
        let mut resolver = CollisionResolver::default();
        let states: Vec<_> = [-100.0, 50.0, 110.0, 200.0, 300.0]
            .into_iter()
            .map(|p| step(&mut resolver, "gap-7", p))
            .collect();
        assert_eq!(
            states,
            vec![
                CollisionState::None,
                CollisionState::Approaching,
                CollisionState::Colliding,
                CollisionState::Passed,
                CollisionState::Processed,
            ]
        );
        assert_eq!(resolver.stats().state_changes, 4);
    }

    #[test]
    fn test_score_once_after_passing() {
        let mut resolver = CollisionResolver::default();
        for p in [-100.0, 50.0, 110.0, 200.0] {
            step(&mut resolver, "gap-7", p);
        }
        assert!(resolver.try_score("gap-7"));
        assert!(!resolver.try_score("gap-7"));
        assert!(resolver.has_scored("gap-7"));
        assert_eq!(resolver.stats().duplicates_rejected, 1);
    }

    #[test]
    fn test_score_debounce() {
        let mut resolver = CollisionResolver::default();
        step(&mut resolver, "gap", 50.0);
        assert!(!resolver.try_score("gap"));
        step(&mut resolver, "gap", 55.0);
        assert!(!resolver.try_score("gap"));
        step(&mut resolver, "gap", 60.0);
        assert!(resolver.try_score("gap"));
    }

    #[test]
    fn test_jitter_into_approach_zone_waits_to_settle() {
        let mut resolver = CollisionResolver::default();
        for _ in 0..5 {
            step(&mut resolver, "gap", -100.0);
        }
        assert_eq!(step(&mut resolver, "gap", 0.0), CollisionState::Approaching);
        assert!(!resolver.try_score("gap"));

        // Jittering back out restarts the run.
        step(&mut resolver, "gap", -100.0);
        step(&mut resolver, "gap", 0.0);
        assert!(!resolver.try_score("gap"));
        step(&mut resolver, "gap", 5.0);
        assert!(resolver.try_score("gap"));
    }

    #[test]
    fn test_teleport_past_obstacle_never_scores() {
        let mut resolver = CollisionResolver::default();
        for _ in 0..5 {
            assert_eq!(step(&mut resolver, "gap", 200.0), CollisionState::None);
        }
        assert!(!resolver.try_score("gap"));
    }

    #[test]
    fn test_damage_once_while_colliding() {
        let mut resolver = CollisionResolver::default();
        step(&mut resolver, "spike", 105.0);
        // A single observation is not enough.
        assert!(!resolver.try_damage("spike"));
        step(&mut resolver, "spike", 106.0);
        assert!(resolver.try_damage("spike"));
        assert!(!resolver.try_damage("spike"));
        assert!(resolver.has_damaged("spike"));
    }

    #[test]
    fn test_damage_requires_colliding() {
        let mut resolver = CollisionResolver::default();
        for p in [40.0, 50.0, 60.0] {
            step(&mut resolver, "spike", p);
        }
        assert!(!resolver.try_damage("spike"));
    }

    #[test]
    fn test_ring_blocks_rescoring_after_removal() {
        let mut resolver = CollisionResolver::default();
        for p in [40.0, 50.0, 60.0] {
            step(&mut resolver, "coin", p);
        }
        assert!(resolver.try_score("coin"));
        assert!(resolver.remove_tracker("coin"));

        for p in [40.0, 50.0, 60.0] {
            step(&mut resolver, "coin", p);
        }
        assert!(!resolver.has_scored("coin"));
        assert!(!resolver.try_score("coin"));
    }

    #[test]
    fn test_clear_all_resets_rings() {
        let mut resolver = CollisionResolver::default();
        for p in [40.0, 50.0, 60.0] {
            step(&mut resolver, "coin", p);
        }
        assert!(resolver.try_score("coin"));
        resolver.clear_all();
        assert_eq!(resolver.tracker_count(), 0);

        for p in [40.0, 50.0, 60.0] {
            step(&mut resolver, "coin", p);
        }
        assert!(resolver.try_score("coin"));
    }

    #[test]
    fn test_unknown_ids_are_neutral() {
        let mut resolver = CollisionResolver::default();
        assert_eq!(resolver.state("ghost"), CollisionState::None);
        assert!(!resolver.has_scored("ghost"));
        assert!(!resolver.has_damaged("ghost"));
        assert!(!resolver.try_score("ghost"));
        assert!(!resolver.try_damage("ghost"));
        assert!(!resolver.remove_tracker("ghost"));
        assert!(resolver.ticks_since_update("ghost").is_none());
    }

    #[test]
    fn test_non_finite_sample_is_ignored() {
        let mut resolver = CollisionResolver::default();
        assert_eq!(
            resolver.resolve_collision("gap", f32::NAN, 20.0, 0.0),
            CollisionState::None
        );
        assert_eq!(resolver.tracker_count(), 0);

        step(&mut resolver, "gap", 50.0);
        assert_eq!(
            resolver.resolve_collision("gap", 100.0, 20.0, f32::INFINITY),
            CollisionState::Approaching
        );
        assert_eq!(resolver.tracker("gap").unwrap().observations(), 1);
    }

    #[test]
    fn test_stale_trackers_are_swept_on_cadence() {
        let mut resolver = CollisionResolver::new(CollisionConfig {
            cleanup_interval_ticks: 10,
            ..Default::default()
        });
        resolver.resolve_collision("idle", 100.0, 20.0, 50.0);

        // 100 ms per tick: after 110 ticks the tracker has idled 11 s.
        for _ in 0..109 {
            resolver.tick(Duration::from_millis(100));
        }
        assert_eq!(resolver.tracker_count(), 1);
        resolver.tick(Duration::from_millis(100));
        assert_eq!(resolver.tracker_count(), 0);
        assert_eq!(resolver.stats().trackers_evicted, 1);
        assert_eq!(resolver.stats().cleanup_passes, 11);
    }

    #[test]
    fn test_processed_trackers_leave_after_grace() {
        let mut resolver = CollisionResolver::default();
        for p in [50.0, 110.0, 200.0, 300.0] {
            step(&mut resolver, "gap", p);
        }
        assert_eq!(resolver.state("gap"), CollisionState::Processed);

        for _ in 0..100 {
            resolver.tick(Duration::from_millis(25));
        }
        // Past the grace period, but the next sweep is at tick 120.
        assert_eq!(resolver.tracker_count(), 1);
        for _ in 0..16 {
            resolver.tick(FRAME);
        }
        assert_eq!(resolver.tracker_count(), 0);
    }

    #[test]
    fn test_ticks_since_update() {
        let mut resolver = CollisionResolver::default();
        step(&mut resolver, "gap", 50.0);
        resolver.tick(FRAME);
        resolver.tick(FRAME);
        assert_eq!(resolver.ticks_since_update("gap"), Some(3));
    }

    #[test]
    fn test_huge_ticks_saturate_clock() {
        let mut resolver = CollisionResolver::default();
        step(&mut resolver, "gap", 50.0);
        resolver.tick(Duration::MAX);
        resolver.tick(Duration::MAX);
        assert_eq!(resolver.clock(), Duration::MAX);
        assert_eq!(resolver.cleanup(), 1);
        assert_eq!(resolver.tracker_count(), 0);
    }
}
