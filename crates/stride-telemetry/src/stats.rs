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

//! Diagnostics snapshot for frame telemetry.

use serde::Serialize;
use stride_core::telemetry::{MetricId, MetricSet, MetricValue, MetricsSnapshot};

/// Fixed-schema statistics of a [`FrameTelemetry`](crate::FrameTelemetry).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TelemetryStats {
    /// Frames recorded since creation or reset.
    pub frames_recorded: u64,
    /// Samples currently in the rolling window.
    pub window_len: usize,
    /// Rate implied by the last frame.
    pub current_fps: f32,
    /// Mean rate over the window.
    pub smoothed_fps: f32,
    /// Variance of the rate over the window.
    pub fps_variance: f32,
    /// Stability signal.
    pub stable: bool,
    /// Mean frame time over the window, in milliseconds.
    pub avg_frame_ms: f32,
    /// Shortest frame in the window, in milliseconds.
    pub min_frame_ms: f32,
    /// Longest frame in the window, in milliseconds.
    pub max_frame_ms: f32,
    /// Newest-half mean minus oldest-half mean of the frame time.
    pub frame_time_trend_ms: f32,
    /// Frames that exceeded the configured budget.
    pub over_budget_frames: u64,
    /// Samples clamped because they were zero, negative or not finite.
    pub clamped_samples: u64,
}

impl MetricsSnapshot for TelemetryStats {
    fn metrics(&self) -> Vec<(MetricId, MetricValue)> {
        MetricSet::new("telemetry")
            .counter("frames_recorded", self.frames_recorded)
            .counter("window_len", self.window_len as u64)
            .gauge("current_fps", self.current_fps as f64)
            .gauge("smoothed_fps", self.smoothed_fps as f64)
            .gauge("fps_variance", self.fps_variance as f64)
            .gauge("stable", if self.stable { 1.0 } else { 0.0 })
            .gauge("avg_frame_ms", self.avg_frame_ms as f64)
            .gauge("min_frame_ms", self.min_frame_ms as f64)
            .gauge("max_frame_ms", self.max_frame_ms as f64)
            .gauge("frame_time_trend_ms", self.frame_time_trend_ms as f64)
            .counter("over_budget_frames", self.over_budget_frames)
            .counter("clamped_samples", self.clamped_samples)
            .build()
    }
}
