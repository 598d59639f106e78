//! Wire types for the monitoring query API
//!
//! Shapes follow the CloudWatch JSON protocol; field names on the wire are
//! PascalCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A name/value pair qualifying a metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl Dimension {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Dimension filter for catalog listings
///
/// A filter without a value matches every metric carrying the dimension.
/// The value member is omitted from the wire entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionFilter {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl DimensionFilter {
    /// Filter on dimension presence only
    pub fn name_only(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
        }
    }

    /// Filter on an exact dimension value
    pub fn with_value(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }
}

/// Metric descriptor returned by a catalog listing
#[derive(Debug, Clone, Deserialize)]
pub struct Metric {
    #[serde(rename = "Namespace")]
    pub namespace: String,
    #[serde(rename = "MetricName")]
    pub metric_name: String,
    #[serde(rename = "Dimensions", default)]
    pub dimensions: Vec<Dimension>,
}

/// Catalog listing request: namespace + metric name + dimension filters
#[derive(Debug, Clone, Serialize)]
pub struct ListMetricsRequest {
    #[serde(rename = "Namespace")]
    pub namespace: String,
    #[serde(rename = "MetricName")]
    pub metric_name: String,
    #[serde(rename = "Dimensions", skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<DimensionFilter>,
}

/// Extended-statistics request for one metric over a time range
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsRequest {
    #[serde(rename = "Namespace")]
    pub namespace: String,
    #[serde(rename = "MetricName")]
    pub metric_name: String,
    #[serde(rename = "Dimensions", skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
    #[serde(rename = "StartTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "EndTime")]
    pub end_time: DateTime<Utc>,
    #[serde(rename = "Period")]
    pub period: u32,
    #[serde(rename = "ExtendedStatistics")]
    pub extended_statistics: Vec<String>,
}

/// One aggregated measurement for a period
#[derive(Debug, Clone, Deserialize)]
pub struct Datapoint {
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "ExtendedStatistics", default)]
    pub extended_statistics: HashMap<String, f64>,
}
