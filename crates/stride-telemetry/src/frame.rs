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

//! Rolling frame history and the rates derived from it.

use crate::stats::TelemetryStats;
use std::time::Duration;
use stride_core::config::TelemetryConfig;
use stride_core::RingBuffer;

/// Number of frames kept in the rolling window (2s at 60Hz).
pub const FRAME_HISTORY: usize = 120;

/// Hard upper bound on a recorded frame, whatever the configuration says.
pub const MAX_FRAME_SECS: f32 = 3600.0;

/// One recorded frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSample {
    /// Duration of the frame after clamping.
    pub duration: Duration,
    /// Monotonic sequence number, starting at zero.
    pub sequence: u64,
}

/// Ingests frame durations and derives instantaneous and smoothed frame rates.
#[derive(Debug, Clone)]
pub struct FrameTelemetry {
    config: TelemetryConfig,
    samples: RingBuffer<FrameSample, FRAME_HISTORY>,
    rates: RingBuffer<f32, FRAME_HISTORY>,
    frame_times_ms: RingBuffer<f32, FRAME_HISTORY>,
    current_rate: f32,
    smoothed_rate: f32,
    rate_variance: f32,
    next_sequence: u64,
    over_budget_frames: u64,
    clamped_samples: u64,
}

impl FrameTelemetry {
    /// Creates an empty telemetry window.
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            config,
            samples: RingBuffer::new(),
            rates: RingBuffer::new(),
            frame_times_ms: RingBuffer::new(),
            current_rate: 0.0,
            smoothed_rate: 0.0,
            rate_variance: 0.0,
            next_sequence: 0,
            over_budget_frames: 0,
            clamped_samples: 0,
        }
    }

    /// Records a frame duration.
    pub fn record(&mut self, duration: Duration) -> FrameSample {
        self.record_secs(duration.as_secs_f32())
    }

    /// Records a raw frame duration in seconds.
    ///
    /// Zero, negative and NaN values are clamped to the configured minimum,
    /// oversized and infinite values to the configured maximum.
    pub fn record_secs(&mut self, secs: f32) -> FrameSample {
        let (min, max) = self.bounds();
        let secs = if secs.is_nan() || secs < min {
            log::debug!("FrameTelemetry: clamping invalid frame duration {secs}");
            self.clamped_samples += 1;
            min
        } else if secs > max {
            log::debug!("FrameTelemetry: clamping oversized frame duration {secs}");
            self.clamped_samples += 1;
            max
        } else {
            secs
        };

        let sample = FrameSample {
            duration: Duration::from_secs_f32(secs),
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;

        if secs > 1.0 / self.config.target_fps.max(1.0) {
            self.over_budget_frames += 1;
        }

        self.samples.push(sample);
        self.frame_times_ms.push(secs * 1000.0);
        self.current_rate = 1.0 / secs;
        self.rates.push(self.current_rate);
        self.smoothed_rate = self.rates.average();
        self.rate_variance = self.rates.variance();

        log::trace!(
            "Frame #{}: {:.2}ms ({:.1} fps, smoothed {:.1})",
            sample.sequence,
            secs * 1000.0,
            self.current_rate,
            self.smoothed_rate
        );
        sample
    }

    fn bounds(&self) -> (f32, f32) {
        let min = self
            .config
            .min_frame_duration_secs
            .max(f32::EPSILON)
            .min(MAX_FRAME_SECS);
        let max = self
            .config
            .max_frame_duration_secs
            .min(MAX_FRAME_SECS)
            .max(min);
        (min, max)
    }

    /// Frame rate implied by the most recent frame, or `0.0` before any frame.
    pub fn current_rate(&self) -> f32 {
        self.current_rate
    }

    /// Mean frame rate over the current window, or `0.0` before any frame.
    pub fn smoothed_rate(&self) -> f32 {
        self.smoothed_rate
    }

    /// Variance of the frame rate over the current window.
    pub fn rate_variance(&self) -> f32 {
        self.rate_variance
    }

    /// `true` when the frame rate variance is below the configured threshold.
    ///
    /// Always `true` until enough samples exist to judge.
    pub fn is_stable(&self) -> bool {
        if self.rates.count() < self.config.min_stable_samples {
            return true;
        }
        self.rate_variance < self.config.stability_variance_threshold
    }

    /// Number of samples currently in the window.
    pub fn sample_count(&self) -> usize {
        self.samples.count()
    }

    /// Total frames recorded since creation or the last reset.
    pub fn frames_recorded(&self) -> u64 {
        self.next_sequence
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<&FrameSample> {
        self.samples.latest()
    }

    /// Samples in the window, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &FrameSample> + '_ {
        self.samples.iter()
    }

    /// The telemetry configuration.
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Discards all history and counters.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    /// Takes a snapshot of the current statistics.
    pub fn stats(&self) -> TelemetryStats {
        TelemetryStats {
            frames_recorded: self.next_sequence,
            window_len: self.samples.count(),
            current_fps: self.current_rate,
            smoothed_fps: self.smoothed_rate,
            fps_variance: self.rate_variance,
            stable: self.is_stable(),
            avg_frame_ms: self.frame_times_ms.average(),
            min_frame_ms: self.frame_times_ms.min(),
            max_frame_ms: self.frame_times_ms.max(),
            frame_time_trend_ms: self.frame_times_ms.trend(),
            over_budget_frames: self.over_budget_frames,
            clamped_samples: self.clamped_samples,
        }
    }
}

impl Default for FrameTelemetry {
    fn default() -> Self {
        Self::new(TelemetryConfig::default())
    }
}
