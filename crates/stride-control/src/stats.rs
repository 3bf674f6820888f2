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

//! Transition records and the diagnostics snapshot of the controller.

use crate::profile::QualityLevel;
use serde::Serialize;
use std::time::Duration;
use stride_core::telemetry::{MetricId, MetricSet, MetricValue, MetricsSnapshot};

/// Why the active level changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ChangeReason {
    /// Sustained frame rate below the low threshold.
    Downgrade,
    /// Sustained frame rate below the critical threshold.
    CriticalDowngrade,
    /// Sustained stable frame rate above the high threshold.
    Upgrade,
    /// Explicit override from the host.
    #[default]
    Manual,
}

/// One level transition.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct QualityChange {
    /// Level before the transition.
    pub from: QualityLevel,
    /// Level after the transition.
    pub to: QualityLevel,
    /// Cause of the transition.
    pub reason: ChangeReason,
    /// Controller clock when the transition happened.
    pub at: Duration,
    /// Smoothed frame rate at the time of the transition.
    pub smoothed_fps: f32,
}

/// Fixed-schema statistics of a [`QualityController`](crate::QualityController).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityStats {
    /// Active level.
    pub level: QualityLevel,
    /// Highest level adaptive upgrades may reach.
    pub ceiling: QualityLevel,
    /// Whether adaptation is enabled.
    pub adaptive: bool,
    /// Ticks evaluated.
    pub ticks: u64,
    /// Adaptive upgrades performed.
    pub upgrades: u64,
    /// Adaptive downgrades performed.
    pub downgrades: u64,
    /// Explicit level overrides applied.
    pub manual_changes: u64,
    /// Ticks on which a transition was due but blocked by the cooldown.
    pub suppressed_by_cooldown: u64,
    /// Current run of low ticks.
    pub low_run: u32,
    /// Current run of high ticks.
    pub high_run: u32,
    /// Time since the last transition, if any happened.
    pub since_last_transition: Option<Duration>,
}

impl MetricsSnapshot for QualityStats {
    fn metrics(&self) -> Vec<(MetricId, MetricValue)> {
        let profile = self.level.profile();
        MetricSet::new("quality")
            .gauge("level", self.level.index() as f64)
            .gauge("ceiling", self.ceiling.index() as f64)
            .gauge("adaptive", if self.adaptive { 1.0 } else { 0.0 })
            .counter("ticks", self.ticks)
            .counter("upgrades", self.upgrades)
            .counter("downgrades", self.downgrades)
            .counter("manual_changes", self.manual_changes)
            .counter("suppressed_by_cooldown", self.suppressed_by_cooldown)
            .gauge("low_run", self.low_run as f64)
            .gauge("high_run", self.high_run as f64)
            .gauge(
                "since_last_transition_secs",
                self.since_last_transition
                    .map(|d| d.as_secs_f64())
                    .unwrap_or(-1.0),
            )
            .gauge("particle_ceiling", profile.particle_ceiling as f64)
            .gauge("render_scale", profile.render_scale as f64)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QualityController;
    use stride_core::telemetry::MetricType;

    #[test]
    fn test_levels_and_runs_are_gauges() {
        let metrics = QualityController::default().stats().metrics();
        let kind = |name: &str| {
            metrics
                .iter()
                .find(|(id, _)| id.name == name)
                .map(|(_, value)| value.metric_type())
        };
        for name in ["level", "ceiling", "low_run", "high_run", "particle_ceiling"] {
            assert_eq!(kind(name), Some(MetricType::Gauge), "{name}");
        }
        for name in ["ticks", "upgrades", "downgrades", "suppressed_by_cooldown"] {
            assert_eq!(kind(name), Some(MetricType::Counter), "{name}");
        }
    }
}
