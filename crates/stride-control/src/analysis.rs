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

//! Heuristic classification of the current frame rate.
//!
//! The `FrameAnalyzer` turns a telemetry window into a single verdict per
//! tick. The controller only counts consecutive verdicts; all threshold
//! logic lives here.

use stride_core::config::QualityConfig;
use stride_telemetry::FrameTelemetry;

/// Classification of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVerdict {
    /// Smoothed rate below the critical threshold.
    Critical,
    /// Smoothed rate below the low threshold.
    Low,
    /// Inside the stable band between the thresholds.
    Nominal,
    /// Smoothed rate above the high threshold (and stable, when required).
    High,
}

impl FrameVerdict {
    /// `true` for verdicts that count toward a downgrade.
    pub fn is_low(self) -> bool {
        matches!(self, FrameVerdict::Critical | FrameVerdict::Low)
    }
}

/// Classifies telemetry against the configured thresholds.
#[derive(Debug, Clone)]
pub struct FrameAnalyzer {
    critical_fps: f32,
    low_fps: f32,
    high_fps: f32,
    upgrade_requires_stability: bool,
}

impl FrameAnalyzer {
    /// Builds an analyzer from the quality thresholds.
    pub fn new(config: &QualityConfig) -> Self {
        Self {
            critical_fps: config.critical_fps_threshold,
            low_fps: config.low_fps_threshold,
            high_fps: config.high_fps_threshold,
            upgrade_requires_stability: config.upgrade_requires_stability,
        }
    }

    /// Classifies the current telemetry window.
    ///
    /// The low side is checked first, so a downgrade verdict always wins.
    pub fn classify(&self, telemetry: &FrameTelemetry) -> FrameVerdict {
        if telemetry.sample_count() == 0 {
            return FrameVerdict::Nominal;
        }

        let fps = telemetry.smoothed_rate();
        if fps < self.critical_fps {
            FrameVerdict::Critical
        } else if fps < self.low_fps {
            FrameVerdict::Low
        } else if fps > self.high_fps {
            if !self.upgrade_requires_stability || telemetry.is_stable() {
                FrameVerdict::High
            } else {
                log::trace!(
                    "FrameAnalyzer: {:.1} fps is above the high threshold but unstable.",
                    fps
                );
                FrameVerdict::Nominal
            }
        } else {
            FrameVerdict::Nominal
        }
    }
}

impl Default for FrameAnalyzer {
    fn default() -> Self {
        Self::new(&QualityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn telemetry_at(frame_ms: u64, frames: usize) -> FrameTelemetry {
        let mut telemetry = FrameTelemetry::default();
        for _ in 0..frames {
            telemetry.record(Duration::from_millis(frame_ms));
        }
        telemetry
    }

    #[test]
    fn test_empty_telemetry_is_nominal() {
        let analyzer = FrameAnalyzer::default();
        assert_eq!(
            analyzer.classify(&FrameTelemetry::default()),
            FrameVerdict::Nominal
        );
    }

    #[test]
    fn test_classification_bands() {
        let analyzer = FrameAnalyzer::default();
        // 20 fps
        assert_eq!(analyzer.classify(&telemetry_at(50, 5)), FrameVerdict::Critical);
        // 40 fps
        assert_eq!(analyzer.classify(&telemetry_at(25, 5)), FrameVerdict::Low);
        // 50 fps
        assert_eq!(analyzer.classify(&telemetry_at(20, 5)), FrameVerdict::Nominal);
        // 100 fps
        assert_eq!(analyzer.classify(&telemetry_at(10, 5)), FrameVerdict::High);
    }

    #[test]
    fn test_unstable_high_rate_is_not_upgrade_worthy() {
        let analyzer = FrameAnalyzer::default();
        let mut telemetry = FrameTelemetry::default();
        for i in 0..30 {
            telemetry.record(Duration::from_millis(if i % 2 == 0 { 4 } else { 12 }));
        }
        assert!(telemetry.smoothed_rate() > 57.0);
        assert!(!telemetry.is_stable());
        assert_eq!(analyzer.classify(&telemetry), FrameVerdict::Nominal);

        let lenient = FrameAnalyzer::new(&QualityConfig {
            upgrade_requires_stability: false,
            ..Default::default()
        });
        assert_eq!(lenient.classify(&telemetry), FrameVerdict::High);
    }

    #[test]
    fn test_is_low() {
        assert!(FrameVerdict::Critical.is_low());
        assert!(FrameVerdict::Low.is_low());
        assert!(!FrameVerdict::Nominal.is_low());
        assert!(!FrameVerdict::High.is_low());
    }
}
