//! Metric rationale passthrough.
//!
//! An optional JSON file maps metric names to free-text explanations of why
//! the metric exists and how its target was set. It is a lookup for the
//! presentation layer only; nothing numeric depends on it.

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::IngestResult;

/// Free-text explanation attached to one metric.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRationale {
    /// Why this metric is tracked.
    #[serde(default = "MetricRationale::default_rationale")]
    pub rationale: String,
    /// Why the target was set where it was.
    #[serde(default = "MetricRationale::default_target_rationale")]
    pub target_rationale: String,
    /// How and when the underlying data becomes available.
    #[serde(default = "MetricRationale::default_data_availability")]
    pub data_availability: String,
}

impl MetricRationale {
    fn default_rationale() -> String {
        "No rationale available.".into()
    }

    fn default_target_rationale() -> String {
        "No target rationale available.".into()
    }

    fn default_data_availability() -> String {
        "Data availability information not specified.".into()
    }
}

impl Default for MetricRationale {
    fn default() -> Self {
        Self {
            rationale: Self::default_rationale(),
            target_rationale: Self::default_target_rationale(),
            data_availability: Self::default_data_availability(),
        }
    }
}

/// Metric-name → rationale lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RationaleMap {
    entries: HashMap<String, MetricRationale>,
}

impl RationaleMap {
    /// Parse a rationale JSON document.
    pub fn from_reader<R: Read>(reader: R) -> IngestResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Rationale for a metric; a placeholder entry when the metric is absent,
    /// so the caller never branches on missingness.
    pub fn get(&self, metric_name: &str) -> MetricRationale {
        self.entries
            .get(metric_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Metric names that have a rationale entry.
    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
