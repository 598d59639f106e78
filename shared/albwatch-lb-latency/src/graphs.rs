//! Static graph definitions published to the host agent
//!
//! Two display groups exist regardless of how many target groups were
//! discovered; `#` in the per-target-group key is the host protocol's
//! wildcard segment, grouping metrics by their target-group name.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::PERCENTILES;

/// Display unit of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Float,
    Integer,
    Percentage,
    Bytes,
}

/// One metric line within a graph
#[derive(Debug, Clone, Serialize)]
pub struct MetricDef {
    pub name: String,
    pub label: String,
}

/// A display group of related metrics
#[derive(Debug, Clone, Serialize)]
pub struct GraphDef {
    pub label: String,
    pub unit: Unit,
    pub metrics: Vec<MetricDef>,
}

fn percentile_metrics() -> Vec<MetricDef> {
    PERCENTILES
        .iter()
        .map(|percentile| MetricDef {
            name: percentile.to_string(),
            label: percentile.to_string(),
        })
        .collect()
}

/// Build the two fixed display groups under the configured prefix
pub fn graph_definitions(prefix: &str) -> BTreeMap<String, GraphDef> {
    let mut graphs = BTreeMap::new();
    graphs.insert(
        prefix.to_string(),
        GraphDef {
            label: "Response Time Percentile".to_string(),
            unit: Unit::Float,
            metrics: percentile_metrics(),
        },
    );
    graphs.insert(
        format!("{}.#", prefix),
        GraphDef {
            label: "Response Time Percentile per Target Group".to_string(),
            unit: Unit::Float,
            metrics: percentile_metrics(),
        },
    );
    graphs
}
