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

//! Quality levels and the static table of settings attached to each.

use serde::{Deserialize, Serialize};

/// Ordered quality levels, lowest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum QualityLevel {
    /// Minimum fidelity.
    Low,
    /// Reduced effects.
    Medium,
    /// Full effects at native resolution.
    #[default]
    High,
    /// Everything enabled, maximum particle budget.
    Ultra,
}

impl QualityLevel {
    /// All levels in ascending order.
    pub const ALL: [QualityLevel; 4] = [
        QualityLevel::Low,
        QualityLevel::Medium,
        QualityLevel::High,
        QualityLevel::Ultra,
    ];

    /// The lowest level.
    pub const LOWEST: QualityLevel = QualityLevel::Low;

    /// The highest level.
    pub const HIGHEST: QualityLevel = QualityLevel::Ultra;

    /// Position of the level in [`QualityLevel::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the level at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The next level down, or `None` at the lowest level.
    pub fn lower(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// The next level up, or `None` at the highest level.
    pub fn higher(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The settings attached to this level.
    pub fn profile(self) -> &'static QualityProfile {
        &PROFILES[self.index()]
    }
}

/// Optional visual effects toggled per quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectFlags {
    /// Glow around collectibles and the player trail.
    pub bloom: bool,
    /// Drop shadows under obstacles.
    pub shadows: bool,
    /// Multi-layer parallax background.
    pub parallax: bool,
    /// Motion trail behind the player.
    pub trails: bool,
    /// Camera shake on impact.
    pub screen_shake: bool,
}

/// Immutable settings for one quality level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityProfile {
    /// The level these settings belong to.
    pub level: QualityLevel,
    /// Maximum live particles.
    pub particle_ceiling: u32,
    /// Fraction of the native resolution to render at.
    pub render_scale: f32,
    /// Update rate the frame limiter should aim for.
    pub target_fps: u32,
    /// Effect toggles.
    pub effects: EffectFlags,
}

static PROFILES: [QualityProfile; 4] = [
    QualityProfile {
        level: QualityLevel::Low,
        particle_ceiling: 64,
        render_scale: 0.6,
        target_fps: 30,
        effects: EffectFlags {
            bloom: false,
            shadows: false,
            parallax: false,
            trails: false,
            screen_shake: true,
        },
    },
    QualityProfile {
        level: QualityLevel::Medium,
        particle_ceiling: 200,
        render_scale: 0.8,
        target_fps: 60,
        effects: EffectFlags {
            bloom: false,
            shadows: false,
            parallax: true,
            trails: false,
            screen_shake: true,
        },
    },
    QualityProfile {
        level: QualityLevel::High,
        particle_ceiling: 500,
        render_scale: 1.0,
        target_fps: 60,
        effects: EffectFlags {
            bloom: true,
            shadows: false,
            parallax: true,
            trails: true,
            screen_shake: true,
        },
    },
    QualityProfile {
        level: QualityLevel::Ultra,
        particle_ceiling: 1000,
        render_scale: 1.0,
        target_fps: 60,
        effects: EffectFlags {
            bloom: true,
            shadows: true,
            parallax: true,
            trails: true,
            screen_shake: true,
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(QualityLevel::Low < QualityLevel::Medium);
        assert!(QualityLevel::High < QualityLevel::Ultra);
        assert_eq!(QualityLevel::LOWEST, QualityLevel::ALL[0]);
        assert_eq!(QualityLevel::HIGHEST, QualityLevel::ALL[3]);
    }

    #[test]
    fn test_lower_and_higher_stop_at_extremes() {
        assert_eq!(QualityLevel::Low.lower(), None);
        assert_eq!(QualityLevel::Ultra.higher(), None);
        assert_eq!(QualityLevel::Medium.lower(), Some(QualityLevel::Low));
        assert_eq!(QualityLevel::Medium.higher(), Some(QualityLevel::High));
    }

    #[test]
    fn test_profile_table_matches_levels() {
        for level in QualityLevel::ALL {
            assert_eq!(level.profile().level, level);
        }
    }

    #[test]
    fn test_profiles_scale_with_level() {
        let ceilings: Vec<u32> = QualityLevel::ALL
            .iter()
            .map(|l| l.profile().particle_ceiling)
            .collect();
        assert!(ceilings.windows(2).all(|w| w[0] < w[1]));
        assert!(QualityLevel::ALL
            .windows(2)
            .all(|w| w[0].profile().render_scale <= w[1].profile().render_scale));
    }
}
