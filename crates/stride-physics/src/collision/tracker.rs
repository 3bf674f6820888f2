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

use super::state::{CollisionState, ObjectId, ObstacleSpan};
use std::time::Duration;

/// Per-obstacle record kept by the [`CollisionResolver`](super::CollisionResolver).
///
/// `scored` and `damaged` only ever go from `false` to `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionTracker {
    id: ObjectId,
    span: ObstacleSpan,
    player_position: f32,
    state: CollisionState,
    last_change_at: Duration,
    scored: bool,
    damaged: bool,
    observations: u32,
    engaged: u32,
    last_seen_tick: u64,
}

impl CollisionTracker {
    pub(crate) fn new(id: ObjectId, now: Duration) -> Self {
        Self {
            id,
            span: ObstacleSpan::default(),
            player_position: 0.0,
            state: CollisionState::None,
            last_change_at: now,
            scored: false,
            damaged: false,
            observations: 0,
            engaged: 0,
            last_seen_tick: 0,
        }
    }

    /// Records one position sample. Returns `true` if the state changed.
    pub(crate) fn observe(
        &mut self,
        span: ObstacleSpan,
        player: f32,
        zone_width: f32,
        now: Duration,
        tick: u64,
    ) -> bool {
        let next = CollisionState::next(span, player, zone_width, self.state);
        self.span = span;
        self.player_position = player;
        self.observations = self.observations.saturating_add(1);
        self.engaged = if next.is_engaged() {
            self.engaged.saturating_add(1)
        } else {
            0
        };
        self.last_seen_tick = tick;

        let changed = next != self.state;
        if changed {
            self.state = next;
            self.last_change_at = now;
        }
        changed
    }

    pub(crate) fn mark_scored(&mut self) {
        self.scored = true;
    }

    pub(crate) fn mark_damaged(&mut self) {
        self.damaged = true;
    }

    /// Whether the tracker should be evicted as of `now`.
    pub(crate) fn is_stale(&self, now: Duration, stale_after: Duration, grace: Duration) -> bool {
        let idle = self.time_in_state(now);
        idle > stale_after || (self.state == CollisionState::Processed && idle > grace)
    }

    /// The obstacle identifier.
    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Obstacle extent from the latest sample.
    pub fn span(&self) -> ObstacleSpan {
        self.span
    }

    /// Player position from the latest sample.
    pub fn player_position(&self) -> f32 {
        self.player_position
    }

    /// Current state.
    pub fn state(&self) -> CollisionState {
        self.state
    }

    /// Resolver clock at the last state change (or at creation).
    pub fn last_change_at(&self) -> Duration {
        self.last_change_at
    }

    /// Time spent in the current state as of `now`.
    pub fn time_in_state(&self, now: Duration) -> Duration {
        now.saturating_sub(self.last_change_at)
    }

    /// Whether a score was authorized.
    pub fn scored(&self) -> bool {
        self.scored
    }

    /// Whether damage was authorized.
    pub fn damaged(&self) -> bool {
        self.damaged
    }

    /// Position samples recorded since creation.
    pub fn observations(&self) -> u32 {
        self.observations
    }

    /// Consecutive samples, up to the latest, in which the player was
    /// approaching, overlapping or just past the obstacle.
    pub fn engaged_observations(&self) -> u32 {
        self.engaged
    }

    /// Resolver tick of the latest position sample.
    pub fn last_seen_tick(&self) -> u64 {
        self.last_seen_tick
    }
}
