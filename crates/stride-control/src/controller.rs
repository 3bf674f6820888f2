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

//! The hysteretic quality state machine.

use crate::analysis::{FrameAnalyzer, FrameVerdict};
use crate::context::TierPolicy;
use crate::profile::{QualityLevel, QualityProfile};
use crate::stats::{ChangeReason, QualityChange, QualityStats};
use std::time::Duration;
use stride_core::config::QualityConfig;
use stride_core::{DeviceTier, RingBuffer};
use stride_telemetry::FrameTelemetry;

/// Number of past transitions kept for diagnostics.
const HISTORY_LEN: usize = 16;

/// Walks the ordered quality levels in response to sustained frame-rate trends.
///
/// The controller keeps its own clock, advanced by the duration of each frame
/// it evaluates, so the cooldown is measured in frame time rather than by
/// sampling the wall clock.
#[derive(Debug, Clone)]
pub struct QualityController {
    config: QualityConfig,
    analyzer: FrameAnalyzer,
    level: QualityLevel,
    ceiling: QualityLevel,
    adaptive: bool,
    clock: Duration,
    last_transition_at: Option<Duration>,
    low_run: u32,
    critical_run: u32,
    high_run: u32,
    ticks: u64,
    upgrades: u64,
    downgrades: u64,
    manual_changes: u64,
    suppressed_by_cooldown: u64,
    history: RingBuffer<QualityChange, HISTORY_LEN>,
}

impl QualityController {
    /// Creates a controller for the given device tier.
    pub fn new(config: QualityConfig, tier: DeviceTier) -> Self {
        Self::with_policy(config, TierPolicy::for_tier(tier))
    }

    /// Creates a controller with an explicit starting level and ceiling.
    pub fn with_policy(config: QualityConfig, policy: TierPolicy) -> Self {
        log::info!(
            "QualityController: starting at {:?} (ceiling {:?}, adaptive={})",
            policy.initial,
            policy.ceiling,
            config.adaptive
        );
        Self {
            analyzer: FrameAnalyzer::new(&config),
            adaptive: config.adaptive,
            config,
            level: policy.initial,
            ceiling: policy.ceiling.max(policy.initial),
            clock: Duration::ZERO,
            last_transition_at: None,
            low_run: 0,
            critical_run: 0,
            high_run: 0,
            ticks: 0,
            upgrades: 0,
            downgrades: 0,
            manual_changes: 0,
            suppressed_by_cooldown: 0,
            history: RingBuffer::new(),
        }
    }

    /// Evaluates one tick, after the telemetry has recorded the frame.
    ///
    /// Returns the transition performed on this tick, if any.
    pub fn update(&mut self, telemetry: &FrameTelemetry) -> Option<QualityChange> {
        let sample = telemetry.latest()?;
        self.clock = self.clock.saturating_add(sample.duration);
        self.ticks += 1;

        if !self.adaptive {
            return None;
        }

        match self.analyzer.classify(telemetry) {
            FrameVerdict::Critical => {
                self.critical_run += 1;
                self.low_run += 1;
                self.high_run = 0;
            }
            FrameVerdict::Low => {
                self.critical_run = 0;
                self.low_run += 1;
                self.high_run = 0;
            }
            FrameVerdict::High => {
                self.critical_run = 0;
                self.low_run = 0;
                self.high_run += 1;
            }
            FrameVerdict::Nominal => self.reset_runs(),
        }

        let (target, reason) = if self.critical_run >= self.config.critical_downgrade_run {
            (self.level.lower(), ChangeReason::CriticalDowngrade)
        } else if self.low_run >= self.config.downgrade_run {
            (self.level.lower(), ChangeReason::Downgrade)
        } else if self.high_run >= self.config.upgrade_run {
            let next = self.level.higher().filter(|next| *next <= self.ceiling);
            (next, ChangeReason::Upgrade)
        } else {
            return None;
        };

        let Some(target) = target else {
            // Already at the bound in that direction.
            log::trace!(
                "QualityController: {:?} requested at {:?}, no level available.",
                reason,
                self.level
            );
            self.reset_runs();
            return None;
        };

        if self.in_cooldown() {
            self.suppressed_by_cooldown += 1;
            return None;
        }

        match reason {
            ChangeReason::Upgrade => self.upgrades += 1,
            _ => self.downgrades += 1,
        }
        Some(self.transition(target, reason, telemetry.smoothed_rate()))
    }

    /// The settings of the active level.
    pub fn current_profile(&self) -> &'static QualityProfile {
        self.level.profile()
    }

    /// The active level.
    pub fn level(&self) -> QualityLevel {
        self.level
    }

    /// Highest level adaptive upgrades may reach.
    pub fn ceiling(&self) -> QualityLevel {
        self.ceiling
    }

    /// Whether adaptation is enabled.
    pub fn is_adaptive(&self) -> bool {
        self.adaptive
    }

    /// Enables or disables adaptation. While disabled the level is frozen.
    pub fn set_adaptive(&mut self, enabled: bool) {
        if self.adaptive != enabled {
            log::info!("QualityController: adaptive mode {}", on_off(enabled));
        }
        self.adaptive = enabled;
        self.reset_runs();
    }

    /// Forces a level. Starts a cooldown so adaptation does not immediately undo it.
    pub fn set_level(&mut self, level: QualityLevel) -> Option<QualityChange> {
        self.reset_runs();
        if level == self.level {
            return None;
        }
        self.manual_changes += 1;
        Some(self.transition(level, ChangeReason::Manual, 0.0))
    }

    /// Controller clock: the sum of all evaluated frame durations.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Past transitions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &QualityChange> + '_ {
        self.history.iter()
    }

    /// Takes a snapshot of the current statistics.
    pub fn stats(&self) -> QualityStats {
        QualityStats {
            level: self.level,
            ceiling: self.ceiling,
            adaptive: self.adaptive,
            ticks: self.ticks,
            upgrades: self.upgrades,
            downgrades: self.downgrades,
            manual_changes: self.manual_changes,
            suppressed_by_cooldown: self.suppressed_by_cooldown,
            low_run: self.low_run,
            high_run: self.high_run,
            since_last_transition: self
                .last_transition_at
                .map(|at| self.clock.saturating_sub(at)),
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_transition_at
            .is_some_and(|at| self.clock.saturating_sub(at) < self.config.cooldown())
    }

    fn transition(
        &mut self,
        target: QualityLevel,
        reason: ChangeReason,
        smoothed_fps: f32,
    ) -> QualityChange {
        let change = QualityChange {
            from: self.level,
            to: target,
            reason,
            at: self.clock,
            smoothed_fps,
        };
        log::info!(
            "QualityController: {:?} -> {:?} ({:?}, {:.1} fps)",
            change.from,
            change.to,
            reason,
            smoothed_fps
        );
        self.level = target;
        self.last_transition_at = Some(self.clock);
        self.reset_runs();
        self.history.push(change);
        change
    }

    fn reset_runs(&mut self) {
        self.low_run = 0;
        self.critical_run = 0;
        self.high_run = 0;
    }
}

impl Default for QualityController {
    fn default() -> Self {
        Self::new(QualityConfig::default(), DeviceTier::default())
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    /// Records `frames` frames of `frame` length, updating the controller after each.
    fn drive(
        controller: &mut QualityController,
        telemetry: &mut FrameTelemetry,
        frame: Duration,
        frames: usize,
    ) -> Vec<QualityChange> {
        (0..frames)
            .filter_map(|_| {
                telemetry.record(frame);
                controller.update(telemetry)
            })
            .collect()
    }

    fn at_level(level: QualityLevel) -> QualityController {
        QualityController::with_policy(QualityConfig::default(), TierPolicy::unrestricted(level))
    }

    #[test]
    fn test_tier_selects_initial_level() {
        let controller = QualityController::new(QualityConfig::default(), DeviceTier::Low);
        assert_eq!(controller.level(), QualityLevel::Low);
        assert_eq!(controller.ceiling(), QualityLevel::Medium);
        assert_eq!(controller.current_profile().level, QualityLevel::Low);
    }

    #[test]
    fn test_downgrade_requires_full_run() {
        let mut controller = at_level(QualityLevel::High);
        let mut telemetry = FrameTelemetry::default();
        let run = QualityConfig::default().downgrade_run as usize;

        // 40 fps: low but not critical.
        assert!(drive(&mut controller, &mut telemetry, ms(25), run - 1).is_empty());
        assert_eq!(controller.level(), QualityLevel::High);

        let changes = drive(&mut controller, &mut telemetry, ms(25), 1);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].from, QualityLevel::High);
        assert_eq!(changes[0].to, QualityLevel::Medium);
        assert_eq!(changes[0].reason, ChangeReason::Downgrade);
        assert_eq!(controller.current_profile().level, QualityLevel::Medium);
    }

    #[test]
    fn test_critical_drop_uses_short_run() {
        let mut controller = at_level(QualityLevel::High);
        let mut telemetry = FrameTelemetry::default();
        let run = QualityConfig::default().critical_downgrade_run as usize;

        let changes = drive(&mut controller, &mut telemetry, ms(50), run);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].reason, ChangeReason::CriticalDowngrade);
    }

    #[test]
    fn test_single_downgrade_within_cooldown() {
        let mut controller = at_level(QualityLevel::HIGHEST);
        let mut telemetry = FrameTelemetry::default();

        // 50 frames at 20 fps = 2.5s, inside the 3s cooldown.
        let changes = drive(&mut controller, &mut telemetry, ms(50), 50);
        assert_eq!(changes.len(), 1);
        assert_eq!(controller.level(), QualityLevel::High);
        assert!(controller.stats().suppressed_by_cooldown > 0);
    }

    #[test]
    fn test_second_downgrade_after_cooldown() {
        let mut controller = at_level(QualityLevel::HIGHEST);
        let mut telemetry = FrameTelemetry::default();

        // 5 frames to trigger, then 60 frames (3s) of cooldown.
        let changes = drive(&mut controller, &mut telemetry, ms(50), 70);
        assert_eq!(changes.len(), 2);
        assert!(changes[1].at - changes[0].at >= Duration::from_secs(3));
        assert_eq!(controller.level(), QualityLevel::Medium);
    }

    #[test]
    fn test_nominal_tick_resets_low_run() {
        let mut controller = at_level(QualityLevel::High);
        let mut low = FrameTelemetry::default();
        let mut nominal = FrameTelemetry::default();
        let run = QualityConfig::default().downgrade_run as usize;

        drive(&mut controller, &mut low, ms(25), run - 1);
        assert!(drive(&mut controller, &mut nominal, ms(20), 1).is_empty());
        assert_eq!(controller.stats().low_run, 0);
        assert!(drive(&mut controller, &mut low, ms(25), run - 1).is_empty());
        assert_eq!(controller.level(), QualityLevel::High);
    }

    #[test]
    fn test_upgrade_after_stable_high_run() {
        let mut controller = QualityController::new(QualityConfig::default(), DeviceTier::Mid);
        let mut telemetry = FrameTelemetry::default();
        let run = QualityConfig::default().upgrade_run as usize;

        assert!(drive(&mut controller, &mut telemetry, ms(10), run - 1).is_empty());
        let changes = drive(&mut controller, &mut telemetry, ms(10), 1);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].reason, ChangeReason::Upgrade);
        assert_eq!(controller.level(), QualityLevel::High);
    }

    #[test]
    fn test_upgrade_stops_at_ceiling() {
        let mut controller = QualityController::new(QualityConfig::default(), DeviceTier::Mid);
        let mut telemetry = FrameTelemetry::default();

        drive(&mut controller, &mut telemetry, ms(10), 2_000);
        assert_eq!(controller.level(), QualityLevel::High);
        assert_eq!(controller.stats().upgrades, 1);
    }

    #[test]
    fn test_downgrade_at_lowest_is_noop() {
        let mut controller = at_level(QualityLevel::LOWEST);
        let mut telemetry = FrameTelemetry::default();

        assert!(drive(&mut controller, &mut telemetry, ms(100), 200).is_empty());
        assert_eq!(controller.level(), QualityLevel::LOWEST);
        assert_eq!(controller.stats().downgrades, 0);
    }

    #[test]
    fn test_disabled_adaptation_freezes_level() {
        let mut controller = at_level(QualityLevel::High);
        let mut telemetry = FrameTelemetry::default();
        controller.set_adaptive(false);

        assert!(drive(&mut controller, &mut telemetry, ms(100), 200).is_empty());
        assert_eq!(controller.level(), QualityLevel::High);

        controller.set_adaptive(true);
        let run = QualityConfig::default().critical_downgrade_run as usize;
        assert_eq!(drive(&mut controller, &mut telemetry, ms(100), run).len(), 1);
    }

    #[test]
    fn test_manual_level_starts_cooldown() {
        let mut controller = at_level(QualityLevel::High);
        let mut telemetry = FrameTelemetry::default();

        let change = controller.set_level(QualityLevel::Ultra).unwrap();
        assert_eq!(change.reason, ChangeReason::Manual);
        assert!(controller.set_level(QualityLevel::Ultra).is_none());

        // Critical frames for 1s: blocked by the cooldown started by the override.
        assert!(drive(&mut controller, &mut telemetry, ms(50), 20).is_empty());
        assert_eq!(controller.level(), QualityLevel::Ultra);
        assert_eq!(controller.history().count(), 1);
        assert_eq!(controller.stats().manual_changes, 1);
    }

    #[test]
    fn test_update_without_samples_is_noop() {
        let mut controller = QualityController::default();
        assert!(controller.update(&FrameTelemetry::default()).is_none());
        assert_eq!(controller.stats().ticks, 0);
    }

    #[test]
    fn test_oversized_frames_advance_clock_by_clamped_duration() {
        let mut controller = QualityController::default();
        let mut telemetry = FrameTelemetry::default();
        let max = Duration::from_secs_f32(telemetry.config().max_frame_duration_secs);
        for _ in 0..3 {
            telemetry.record(Duration::MAX);
            controller.update(&telemetry);
        }
        assert_eq!(controller.clock(), max * 3);
        assert_eq!(controller.stats().ticks, 3);
    }

    proptest! {
        /// Adaptive transitions stay in bounds and respect the cooldown.
        #[test]
        fn prop_transitions_respect_bounds_and_cooldown(
            frames in prop::collection::vec(1u64..120, 1..600),
            start in 0usize..4,
        ) {
            let start = QualityLevel::from_index(start).unwrap();
            let mut controller = at_level(start);
            let mut telemetry = FrameTelemetry::default();
            let cooldown = QualityConfig::default().cooldown();

            let mut changes = Vec::new();
            for frame in frames {
                telemetry.record(ms(frame));
                if let Some(change) = controller.update(&telemetry) {
                    changes.push(change);
                }
                prop_assert!(controller.level() >= QualityLevel::LOWEST);
                prop_assert!(controller.level() <= controller.ceiling());
            }

            for pair in changes.windows(2) {
                prop_assert!(pair[1].at - pair[0].at >= cooldown);
            }
            for change in &changes {
                let step = change.from.index().abs_diff(change.to.index());
                prop_assert_eq!(step, 1);
            }
        }
    }
}
