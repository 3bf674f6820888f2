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

//! The "common language" for diagnostics.
//!
//! Every component of the core keeps its statistics in a fixed-schema struct.
//! Those structs implement [`MetricsSnapshot`] so that a diagnostics overlay
//! can consume all of them through one flat key/value projection.

pub mod metrics;

pub use self::metrics::{MetricId, MetricSet, MetricType, MetricValue, MetricsSnapshot};
