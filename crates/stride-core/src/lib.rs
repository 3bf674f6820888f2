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

//! # Stride Core
//!
//! Foundational crate containing the shared vocabulary of the Stride
//! performance core: the diagnostics metric types, fixed-capacity
//! collections used on the frame path, the coarse device tier, and the
//! configuration model consumed by every other crate.

#![warn(missing_docs)]

pub mod collections;
pub mod config;
pub mod platform;
pub mod telemetry;

pub use collections::RingBuffer;
pub use config::{ConfigError, StrideConfig};
pub use platform::DeviceTier;
pub use telemetry::{MetricId, MetricSet, MetricValue, MetricsSnapshot};
