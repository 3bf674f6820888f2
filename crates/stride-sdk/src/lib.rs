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

//! The public-facing SDK of the Stride performance core.
//!
//! A host game owns one [`PerformanceCore`] per session and drives it from
//! its frame loop: [`PerformanceCore::record_frame`] once per tick, collision
//! samples as obstacles move, and [`PerformanceCore::maintenance`] from a
//! slower housekeeping timer. Rendering and gameplay read the active
//! [`QualityProfile`](stride_control::QualityProfile) whenever they need it.

pub mod diagnostics;
pub mod performance;

pub use diagnostics::DiagnosticsReport;
pub use performance::PerformanceCore;

/// Everything a host typically needs.
pub mod prelude {
    pub use crate::{DiagnosticsReport, PerformanceCore};
    pub use stride_control::{ChangeReason, EffectFlags, QualityChange, QualityLevel, QualityProfile};
    pub use stride_core::{DeviceTier, MetricsSnapshot, StrideConfig};
    pub use stride_data::{ExhaustionPolicy, PoolConfig, PoolRegistry, Poolable, Pooled, ResourcePool};
    pub use stride_physics::{CollisionState, ObjectId};
}
