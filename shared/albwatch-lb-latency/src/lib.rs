//! Latency percentile collection for application load balancers
//!
//! This crate provides:
//! - [`discover_target_groups`]: lists the target groups currently
//!   reporting response-time metrics for a load balancer
//! - [`LatencyCollector`]: queries the latest response-time percentiles
//!   for the load balancer and each target group into one flat
//!   [`MetricSnapshot`]
//! - [`graph_definitions`]: the static display groups published to the
//!   host agent

pub mod collector;
pub mod discovery;
pub mod graphs;
pub mod types;

pub use collector::{CollectError, LatencyCollector};
pub use discovery::discover_target_groups;
pub use graphs::{graph_definitions, GraphDef, MetricDef, Unit};
pub use types::{short_target_group_name, MetricSnapshot, Scope};

/// Metric namespace for application load balancers
pub const NAMESPACE: &str = "AWS/ApplicationELB";

/// Response-time metric behind both discovery and collection
pub const RESPONSE_TIME_METRIC: &str = "TargetResponseTime";

/// Dimension naming the target group on a response-time metric
pub const DIMENSION_TARGET_GROUP: &str = "TargetGroup";

/// Dimension naming the load balancer on a response-time metric
pub const DIMENSION_LOAD_BALANCER: &str = "LoadBalancer";

/// Percentile statistics collected for every scope
pub const PERCENTILES: [&str; 5] = ["p99", "p95", "p90", "p50", "p10"];
