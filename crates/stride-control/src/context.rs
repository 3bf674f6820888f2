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

//! Device context for the quality controller.

use crate::profile::QualityLevel;
use stride_core::DeviceTier;

/// Starting level and adaptive ceiling derived from the device tier.
///
/// | Tier | Initial | Ceiling |
/// |---|---|---|
/// | Low | Low | Medium |
/// | Mid | Medium | High |
/// | High | High | Ultra |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    /// Level the controller starts at.
    pub initial: QualityLevel,
    /// Highest level adaptive upgrades may reach.
    pub ceiling: QualityLevel,
}

impl TierPolicy {
    /// Returns the policy for a device tier.
    pub fn for_tier(tier: DeviceTier) -> Self {
        match tier {
            DeviceTier::Low => Self {
                initial: QualityLevel::Low,
                ceiling: QualityLevel::Medium,
            },
            DeviceTier::Mid => Self {
                initial: QualityLevel::Medium,
                ceiling: QualityLevel::High,
            },
            DeviceTier::High => Self {
                initial: QualityLevel::High,
                ceiling: QualityLevel::Ultra,
            },
        }
    }

    /// A policy that starts at `level` and may reach the highest level.
    pub fn unrestricted(level: QualityLevel) -> Self {
        Self {
            initial: level,
            ceiling: QualityLevel::HIGHEST,
        }
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self::for_tier(DeviceTier::default())
    }
}
