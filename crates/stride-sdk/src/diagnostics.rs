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

//! Aggregated snapshot of every component, for logging and export.

use serde::Serialize;
use stride_control::QualityStats;
use stride_core::telemetry::{MetricId, MetricValue, MetricsSnapshot};
use stride_data::PoolStats;
use stride_physics::CollisionStats;
use stride_telemetry::TelemetryStats;

/// Point-in-time statistics of a [`PerformanceCore`](crate::PerformanceCore).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticsReport {
    /// Frame telemetry.
    pub telemetry: TelemetryStats,
    /// Adaptive quality.
    pub quality: QualityStats,
    /// One entry per registered pool, sorted by name.
    pub pools: Vec<PoolStats>,
    /// Collision resolution.
    pub collision: CollisionStats,
}

impl DiagnosticsReport {
    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Flattens the report into metric key/value pairs.
    pub fn flatten(&self) -> Vec<(MetricId, MetricValue)> {
        self.metrics()
    }
}

impl MetricsSnapshot for DiagnosticsReport {
    fn metrics(&self) -> Vec<(MetricId, MetricValue)> {
        let mut metrics = self.telemetry.metrics();
        metrics.extend(self.quality.metrics());
        for pool in &self.pools {
            metrics.extend(pool.metrics());
        }
        metrics.extend(self.collision.metrics());
        metrics
    }
}
