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

use crate::diagnostics::DiagnosticsReport;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use stride_control::{QualityChange, QualityController, QualityLevel, QualityProfile};
use stride_core::{DeviceTier, StrideConfig};
use stride_data::PoolRegistry;
use stride_physics::{CollisionResolver, CollisionState};
use stride_telemetry::FrameTelemetry;

/// Owned bundle of the four performance components of one game session.
///
/// All calls are synchronous and expected from a single thread.
#[derive(Debug)]
pub struct PerformanceCore {
    telemetry: FrameTelemetry,
    quality: QualityController,
    pools: PoolRegistry,
    collisions: CollisionResolver,
}

impl PerformanceCore {
    /// Builds every component from `config`, starting quality from the device tier.
    pub fn new(config: StrideConfig, tier: DeviceTier) -> Self {
        log::info!(
            "PerformanceCore: starting for {:?} tier (adaptive={})",
            tier,
            config.quality.adaptive
        );
        Self {
            telemetry: FrameTelemetry::new(config.telemetry),
            quality: QualityController::new(config.quality, tier),
            pools: PoolRegistry::with_defaults(config.pool_defaults),
            collisions: CollisionResolver::new(config.collision),
        }
    }

    /// Loads and validates a RON or JSON config file, then builds the core.
    pub fn from_config_file(path: impl AsRef<Path>, tier: DeviceTier) -> Result<Self> {
        let path = path.as_ref();
        let config = StrideConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(Self::new(config, tier))
    }

    /// Feeds one frame duration: telemetry, then quality, then the collision clock.
    ///
    /// Out-of-range durations are clamped once by the telemetry, and every
    /// clock advances by the clamped value.
    ///
    /// Returns the quality transition this frame caused, if any.
    pub fn record_frame(&mut self, duration: Duration) -> Option<QualityChange> {
        let sample = self.telemetry.record(duration);
        let change = self.quality.update(&self.telemetry);
        self.collisions.tick(sample.duration);
        change
    }

    /// Settings of the active quality level.
    pub fn current_quality_profile(&self) -> &'static QualityProfile {
        self.quality.current_profile()
    }

    /// Enables or disables adaptive quality. Disabled, the level only moves on request.
    pub fn set_adaptive_quality(&mut self, enabled: bool) {
        self.quality.set_adaptive(enabled);
    }

    /// Forces a quality level and starts a cooldown.
    pub fn set_quality_level(&mut self, level: QualityLevel) -> Option<QualityChange> {
        self.quality.set_level(level)
    }

    /// The frame telemetry.
    pub fn telemetry(&self) -> &FrameTelemetry {
        &self.telemetry
    }

    /// The quality controller.
    pub fn quality(&self) -> &QualityController {
        &self.quality
    }

    /// The pool registry.
    pub fn pools(&self) -> &PoolRegistry {
        &self.pools
    }

    /// The pool registry, mutably, for registering and acquiring.
    pub fn pools_mut(&mut self) -> &mut PoolRegistry {
        &mut self.pools
    }

    /// The collision resolver.
    pub fn collisions(&self) -> &CollisionResolver {
        &self.collisions
    }

    /// Feeds one obstacle/player position sample. See [`CollisionResolver::resolve_collision`].
    pub fn resolve_collision(
        &mut self,
        id: &str,
        object_position: f32,
        object_span: f32,
        player_position: f32,
    ) -> CollisionState {
        self.collisions
            .resolve_collision(id, object_position, object_span, player_position)
    }

    /// Authorizes an obstacle's score at most once.
    pub fn try_score(&mut self, id: &str) -> bool {
        self.collisions.try_score(id)
    }

    /// Authorizes an obstacle's damage at most once.
    pub fn try_damage(&mut self, id: &str) -> bool {
        self.collisions.try_damage(id)
    }

    /// Forgets a despawned obstacle.
    pub fn remove_tracker(&mut self, id: &str) -> bool {
        self.collisions.remove_tracker(id)
    }

    /// Forgets every obstacle, for a game reset.
    pub fn clear_all(&mut self) {
        self.collisions.clear_all();
    }

    /// Periodic housekeeping: idle-evicts every pool. Returns how many instances were dropped.
    pub fn maintenance(&mut self) -> usize {
        let evicted = self.pools.cleanup_all();
        if evicted > 0 {
            log::debug!("PerformanceCore: maintenance evicted {} pooled instances", evicted);
        }
        evicted
    }

    /// Snapshots every component.
    pub fn diagnostics(&self) -> DiagnosticsReport {
        DiagnosticsReport {
            telemetry: self.telemetry.stats(),
            quality: self.quality.stats(),
            pools: self.pools.stats(),
            collision: self.collisions.stats(),
        }
    }
}

impl Default for PerformanceCore {
    fn default() -> Self {
        Self::new(StrideConfig::default(), DeviceTier::default())
    }
}
