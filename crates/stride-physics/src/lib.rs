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

//! # Stride Physics
//!
//! Turns per-frame obstacle and player positions into a monotonic collision
//! state per obstacle, and authorizes each obstacle's score and damage
//! outcome at most once.

#![warn(missing_docs)]

pub mod collision;

pub use collision::{
    CollisionResolver, CollisionState, CollisionStats, CollisionTracker, ObjectId, ObstacleSpan,
};
pub use stride_core::config::CollisionConfig;
