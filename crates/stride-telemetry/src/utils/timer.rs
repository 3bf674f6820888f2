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

//! Provides an RAII timer that records a frame when it goes out of scope.

use crate::frame::FrameTelemetry;
use std::time::{Duration, Instant};

/// Times a scope and records the elapsed duration into a [`FrameTelemetry`]
/// when dropped.
///
/// The measurement is recorded even on early returns.
pub struct FrameTimer<'a> {
    started: Instant,
    telemetry: &'a mut FrameTelemetry,
}

impl<'a> FrameTimer<'a> {
    /// Starts timing immediately.
    pub fn start(telemetry: &'a mut FrameTelemetry) -> Self {
        Self {
            started: Instant::now(),
            telemetry,
        }
    }

    /// Time elapsed since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for FrameTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        self.telemetry.record(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_records_on_drop() {
        let mut telemetry = FrameTelemetry::default();
        {
            let timer = FrameTimer::start(&mut telemetry);
            std::thread::sleep(Duration::from_millis(2));
            assert!(timer.elapsed() >= Duration::from_millis(2));
        }
        assert_eq!(telemetry.frames_recorded(), 1);
        let sample = telemetry.latest().copied().unwrap();
        assert!(sample.duration >= Duration::from_millis(1));
    }
}
