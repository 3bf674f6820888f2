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

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// Where the player stands relative to one obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CollisionState {
    /// Out of range, or never observed.
    #[default]
    None,
    /// Within one zone-width before the leading edge.
    Approaching,
    /// Inside the obstacle's span.
    Colliding,
    /// Within one zone-width past the trailing edge, having come from the front.
    Passed,
    /// More than one zone-width past the trailing edge.
    Processed,
}

impl CollisionState {
    /// Computes the next state from current positions.
    ///
    /// Rules in priority order:
    /// 1. inside the span: `Colliding`
    /// 2. within one zone past the trailing edge, previously `Approaching`,
    ///    `Colliding` or `Passed`: `Passed`
    /// 3. within one zone before the leading edge: `Approaching`
    /// 4. beyond one zone past the trailing edge: `Processed`
    /// 5. otherwise `None`
    pub fn next(span: ObstacleSpan, player: f32, zone_width: f32, previous: Self) -> Self {
        if player >= span.leading && player <= span.trailing {
            CollisionState::Colliding
        } else if player > span.trailing
            && player <= span.trailing + zone_width
            && previous.is_engaged()
        {
            CollisionState::Passed
        } else if player < span.leading && player >= span.leading - zone_width {
            CollisionState::Approaching
        } else if player > span.trailing + zone_width {
            CollisionState::Processed
        } else {
            CollisionState::None
        }
    }

    /// States in which the player is near or on the obstacle.
    pub fn is_engaged(self) -> bool {
        matches!(
            self,
            CollisionState::Approaching | CollisionState::Colliding | CollisionState::Passed
        )
    }

    /// States in which a score may be authorized.
    pub fn can_score(self) -> bool {
        matches!(self, CollisionState::Passed | CollisionState::Approaching)
    }
}

impl fmt::Display for CollisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollisionState::None => "none",
            CollisionState::Approaching => "approaching",
            CollisionState::Colliding => "colliding",
            CollisionState::Passed => "passed",
            CollisionState::Processed => "processed",
        };
        f.write_str(name)
    }
}

/// Horizontal extent of an obstacle, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ObstacleSpan {
    /// Edge the player reaches first.
    pub leading: f32,
    /// Edge the player leaves last.
    pub trailing: f32,
}

impl ObstacleSpan {
    /// Span starting at `position` and extending `width` units forward.
    ///
    /// A negative width extends backward; the edges are always ordered.
    pub fn new(position: f32, width: f32) -> Self {
        let end = position + width;
        Self {
            leading: position.min(end),
            trailing: position.max(end),
        }
    }

    /// `true` if both edges are finite.
    pub fn is_finite(&self) -> bool {
        self.leading.is_finite() && self.trailing.is_finite()
    }
}

/// Stable identifier of a tracked obstacle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct ObjectId(String);

impl ObjectId {
    /// Creates an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ObjectId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONE: f32 = 120.0;

    fn span() -> ObstacleSpan {
        ObstacleSpan::new(100.0, 20.0)
    }

    #[test]
    fn test_rule_table() {
        let prev = CollisionState::Approaching;
        assert_eq!(CollisionState::next(span(), 110.0, ZONE, prev), CollisionState::Colliding);
        assert_eq!(CollisionState::next(span(), 100.0, ZONE, prev), CollisionState::Colliding);
        assert_eq!(CollisionState::next(span(), 120.0, ZONE, prev), CollisionState::Colliding);
        assert_eq!(CollisionState::next(span(), 200.0, ZONE, prev), CollisionState::Passed);
        assert_eq!(CollisionState::next(span(), 50.0, ZONE, prev), CollisionState::Approaching);
        assert_eq!(CollisionState::next(span(), -20.0, ZONE, prev), CollisionState::Approaching);
        assert_eq!(CollisionState::next(span(), 241.0, ZONE, prev), CollisionState::Processed);
        assert_eq!(CollisionState::next(span(), -100.0, ZONE, prev), CollisionState::None);
    }

    #[test]
    fn test_passed_requires_coming_from_front() {
        for prev in [CollisionState::None, CollisionState::Processed] {
            assert_eq!(CollisionState::next(span(), 200.0, ZONE, prev), CollisionState::None);
        }
        for prev in [
            CollisionState::Approaching,
            CollisionState::Colliding,
            CollisionState::Passed,
        ] {
            assert_eq!(CollisionState::next(span(), 200.0, ZONE, prev), CollisionState::Passed);
        }
    }

    #[test]
    fn test_span_edges_are_ordered() {
        let span = ObstacleSpan::new(100.0, -20.0);
        assert_eq!(span.leading, 80.0);
        assert_eq!(span.trailing, 100.0);
        assert!(!ObstacleSpan::new(f32::NAN, 1.0).is_finite());
    }

    #[test]
    fn test_object_id_conversions() {
        let id: ObjectId = "gap-7".into();
        assert_eq!(id.as_str(), "gap-7");
        assert_eq!(id.to_string(), "gap-7");
        assert_eq!(id, ObjectId::new(String::from("gap-7")));
    }
}
