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

//! Configuration for every component of the performance core.
//!
//! All sections deserialize with `#[serde(default)]`, so a RON or JSON
//! document only needs to name the values it overrides. Durations are
//! written in seconds and converted to [`Duration`] on access.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("I/O error reading configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The RON document is malformed.
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// The JSON document is malformed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The values parsed but are inconsistent.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Frame telemetry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Frame-rate variance (fps²) under which the frame rate counts as stable.
    pub stability_variance_threshold: f32,
    /// Below this many samples the frame rate is always reported stable.
    pub min_stable_samples: usize,
    /// Durations below this (in seconds, including zero, negative and NaN) are clamped to it.
    pub min_frame_duration_secs: f32,
    /// Durations above this (in seconds) are clamped to it.
    pub max_frame_duration_secs: f32,
    /// Update rate used to count over-budget frames.
    pub target_fps: f32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            stability_variance_threshold: 40.0,
            min_stable_samples: 10,
            min_frame_duration_secs: 1.0e-4,
            max_frame_duration_secs: 60.0,
            target_fps: 60.0,
        }
    }
}

impl TelemetryConfig {
    /// The per-frame budget implied by `target_fps`.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.target_fps.max(1.0))
    }
}

/// Adaptive quality settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Smoothed frame rate under which ticks count toward a downgrade.
    pub low_fps_threshold: f32,
    /// Smoothed frame rate above which ticks count toward an upgrade.
    pub high_fps_threshold: f32,
    /// Smoothed frame rate under which the shorter critical run applies.
    pub critical_fps_threshold: f32,
    /// Consecutive low ticks required for a downgrade.
    pub downgrade_run: u32,
    /// Consecutive critical ticks required for a downgrade.
    pub critical_downgrade_run: u32,
    /// Consecutive high ticks required for an upgrade.
    pub upgrade_run: u32,
    /// Minimum time between two transitions, in seconds.
    pub cooldown_secs: f32,
    /// Whether the controller adapts at all.
    pub adaptive: bool,
    /// Whether upgrades additionally require a stable frame rate.
    pub upgrade_requires_stability: bool,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            low_fps_threshold: 45.0,
            high_fps_threshold: 57.0,
            critical_fps_threshold: 30.0,
            downgrade_run: 20,
            critical_downgrade_run: 5,
            upgrade_run: 60,
            cooldown_secs: 3.0,
            adaptive: true,
            upgrade_requires_stability: true,
        }
    }
}

impl QualityConfig {
    /// The transition cooldown as a [`Duration`].
    pub fn cooldown(&self) -> Duration {
        secs(self.cooldown_secs)
    }
}

/// Collision resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Width of the approach and scoring zones on either side of an obstacle, in world units.
    pub zone_width: f32,
    /// Observations a tracker needs beyond this count before it may score.
    pub score_debounce_frames: u32,
    /// Consecutive engaged observations (approaching, colliding or passed) a
    /// tracker needs beyond this count before it may score.
    pub score_settle_frames: u32,
    /// Observations a tracker needs beyond this count before it may deal damage.
    pub damage_debounce_frames: u32,
    /// A tracker whose state has not changed for this long (seconds) is evicted.
    pub stale_after_secs: f32,
    /// A `processed` tracker is evicted after remaining processed this long (seconds).
    pub processed_grace_secs: f32,
    /// The staleness sweep runs once every this many ticks.
    pub cleanup_interval_ticks: u64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            zone_width: 120.0,
            score_debounce_frames: 2,
            score_settle_frames: 1,
            damage_debounce_frames: 1,
            stale_after_secs: 10.0,
            processed_grace_secs: 2.0,
            cleanup_interval_ticks: 120,
        }
    }
}

impl CollisionConfig {
    /// The staleness threshold as a [`Duration`].
    pub fn stale_after(&self) -> Duration {
        secs(self.stale_after_secs)
    }

    /// The processed grace period as a [`Duration`].
    pub fn processed_grace(&self) -> Duration {
        secs(self.processed_grace_secs)
    }
}

/// What a pool does when `acquire` is called with `max_size` instances already in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExhaustionPolicy {
    /// Construct an unpooled overflow instance so the caller never fails.
    #[default]
    OverAllocate,
    /// Refuse the request; suited to transient objects that can simply be skipped.
    DropOnBusy,
}

/// Object pool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Instances constructed up-front.
    pub prewarm: usize,
    /// Maximum instances in use before the exhaustion policy applies,
    /// and maximum length of the free-list.
    pub max_size: usize,
    /// Free-list entries idle longer than this (seconds) are evicted by `cleanup`.
    pub idle_timeout_secs: f32,
    /// Behavior once `max_size` instances are in use.
    pub policy: ExhaustionPolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            prewarm: 8,
            max_size: 64,
            idle_timeout_secs: 30.0,
            policy: ExhaustionPolicy::OverAllocate,
        }
    }
}

impl PoolConfig {
    /// Creates a config with the given sizes and default timeout and policy.
    pub fn sized(prewarm: usize, max_size: usize) -> Self {
        Self {
            prewarm,
            max_size,
            ..Default::default()
        }
    }

    /// Returns a copy using the given exhaustion policy.
    pub fn with_policy(mut self, policy: ExhaustionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns a copy using the given idle timeout.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout_secs = timeout.as_secs_f32();
        self
    }

    /// The idle eviction age as a [`Duration`].
    pub fn idle_timeout(&self) -> Duration {
        secs(self.idle_timeout_secs)
    }
}

/// Complete configuration of the performance core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrideConfig {
    /// Frame telemetry settings.
    pub telemetry: TelemetryConfig,
    /// Adaptive quality settings.
    pub quality: QualityConfig,
    /// Collision resolution settings.
    pub collision: CollisionConfig,
    /// Defaults for pools registered without an explicit config.
    pub pool_defaults: PoolConfig,
}

impl StrideConfig {
    /// Parses and validates a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.ron` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::from_ron_str(&source)?,
            Some("json") => Self::from_json_str(&source)?,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unsupported configuration extension: {other:?}"
                )))
            }
        };
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Checks that the values are mutually consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let q = &self.quality;
        if q.low_fps_threshold >= q.high_fps_threshold {
            return Err(ConfigError::Invalid(format!(
                "low_fps_threshold ({}) must be below high_fps_threshold ({})",
                q.low_fps_threshold, q.high_fps_threshold
            )));
        }
        if q.critical_fps_threshold > q.low_fps_threshold {
            return Err(ConfigError::Invalid(format!(
                "critical_fps_threshold ({}) must not exceed low_fps_threshold ({})",
                q.critical_fps_threshold, q.low_fps_threshold
            )));
        }
        if q.downgrade_run == 0 || q.critical_downgrade_run == 0 || q.upgrade_run == 0 {
            return Err(ConfigError::Invalid("run lengths must be at least 1".into()));
        }
        let t = &self.telemetry;
        if !t.max_frame_duration_secs.is_finite()
            || t.max_frame_duration_secs <= t.min_frame_duration_secs
        {
            return Err(ConfigError::Invalid(format!(
                "max_frame_duration_secs ({}) must be finite and above min_frame_duration_secs ({})",
                t.max_frame_duration_secs, t.min_frame_duration_secs
            )));
        }
        if !t.target_fps.is_finite() || t.target_fps <= 0.0 {
            return Err(ConfigError::Invalid("target_fps must be positive".into()));
        }
        if !self.collision.zone_width.is_finite() || self.collision.zone_width <= 0.0 {
            return Err(ConfigError::Invalid("zone_width must be positive".into()));
        }
        if self.collision.cleanup_interval_ticks == 0 {
            return Err(ConfigError::Invalid(
                "cleanup_interval_ticks must be at least 1".into(),
            ));
        }
        if self.pool_defaults.max_size == 0 {
            return Err(ConfigError::Invalid("pool max_size must be at least 1".into()));
        }
        Ok(())
    }
}

fn secs(value: f32) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::try_from_secs_f32(value).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
