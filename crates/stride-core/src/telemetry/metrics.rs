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

//! Flat key/value metric definitions used at the diagnostics boundary.

use serde::Serialize;
use std::fmt::Display;

/// A unique, structured identifier for a metric.
///
/// A `MetricId` is composed of a namespace, a name, and a set of key-value labels,
/// allowing a diagnostics overlay to group and filter values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MetricId {
    /// The component the metric belongs to (e.g., "telemetry", "pool").
    pub namespace: String,
    /// The specific name of the metric (e.g., "smoothed_fps", "hits").
    pub name: String,
    /// Optional, sorted key-value pairs for dimensional filtering.
    pub labels: Vec<(String, String)>,
}

impl MetricId {
    /// Creates a new `MetricId` with a namespace and a name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            labels: Vec::new(),
        }
    }

    /// Adds a dimensional label to the metric ID, returning a new `MetricId`.
    /// Labels are kept sorted by key for consistent hashing and display.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self.labels.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }

    /// Returns a formatted string representation of the ID (e.g., "namespace:name[k=v,...]").
    pub fn to_string_formatted(&self) -> String {
        if self.labels.is_empty() {
            format!("{}:{}", self.namespace, self.name)
        } else {
            let labels_str = self
                .labels
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(",");
            format!("{}:{}[{}]", self.namespace, self.name, labels_str)
        }
    }
}

impl Display for MetricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_formatted())
    }
}

/// The fundamental type of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// A value that only ever increases or resets to zero (e.g., total requests).
    Counter,
    /// A value that can go up or down (e.g., current frame rate).
    Gauge,
}

/// A single metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// A 64-bit unsigned integer for counters.
    Counter(u64),
    /// A 64-bit float for gauges, rates and ratios.
    Gauge(f64),
}

impl MetricValue {
    /// Returns the [`MetricType`] corresponding to this value.
    pub fn metric_type(&self) -> MetricType {
        match self {
            MetricValue::Counter(_) => MetricType::Counter,
            MetricValue::Gauge(_) => MetricType::Gauge,
        }
    }

    /// Returns the value as an `f64`.
    pub fn as_f64(&self) -> f64 {
        match self {
            MetricValue::Counter(v) => *v as f64,
            MetricValue::Gauge(v) => *v,
        }
    }

    /// Returns the value as a `u64` if it is a `Counter`.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            MetricValue::Counter(v) => Some(*v),
            MetricValue::Gauge(_) => None,
        }
    }

    /// Returns the value as an `f64` if it is a `Gauge`.
    pub fn as_gauge(&self) -> Option<f64> {
        match self {
            MetricValue::Gauge(v) => Some(*v),
            MetricValue::Counter(_) => None,
        }
    }
}

/// A read-only projection of a component's statistics into flat key/value form.
pub trait MetricsSnapshot {
    /// Flattens the statistics into `(id, value)` pairs.
    fn metrics(&self) -> Vec<(MetricId, MetricValue)>;
}

/// Builder collecting metrics that share a namespace and a set of labels.
#[derive(Debug, Clone)]
pub struct MetricSet {
    namespace: String,
    labels: Vec<(String, String)>,
    entries: Vec<(MetricId, MetricValue)>,
}

impl MetricSet {
    /// Starts a new set for the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            labels: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Adds a label applied to every metric subsequently pushed.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self
    }

    /// Pushes a counter metric.
    pub fn counter(self, name: &str, value: u64) -> Self {
        self.push(name, MetricValue::Counter(value))
    }

    /// Pushes a gauge metric.
    pub fn gauge(self, name: &str, value: f64) -> Self {
        self.push(name, MetricValue::Gauge(value))
    }

    fn push(mut self, name: &str, value: MetricValue) -> Self {
        let mut id = MetricId::new(self.namespace.clone(), name);
        for (key, label) in &self.labels {
            id = id.with_label(key.clone(), label.clone());
        }
        self.entries.push((id, value));
        self
    }

    /// Consumes the set, returning the collected pairs.
    pub fn build(self) -> Vec<(MetricId, MetricValue)> {
        self.entries
    }
}
