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

//! Adaptive quality control.
//!
//! The [`QualityController`] consumes [`FrameTelemetry`](stride_telemetry::FrameTelemetry)
//! once per tick and walks an ordered set of [`QualityLevel`]s, trading
//! visual fidelity for frame time. Hysteresis comes from disjoint low/high
//! thresholds, run-length requirements and a transition cooldown.

#![warn(missing_docs)]

pub mod analysis;
pub mod context;
pub mod controller;
pub mod profile;
pub mod stats;

pub use analysis::{FrameAnalyzer, FrameVerdict};
pub use context::TierPolicy;
pub use controller::QualityController;
pub use profile::{EffectFlags, QualityLevel, QualityProfile};
pub use stats::{ChangeReason, QualityChange, QualityStats};
