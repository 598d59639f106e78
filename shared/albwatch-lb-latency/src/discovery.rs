//! Target-group discovery
//!
//! Lists the metric catalog and extracts the target groups currently
//! reporting response-time metrics under the configured scope.

use albwatch_cloudwatch::{CloudWatchError, DimensionFilter, ListMetricsRequest, MetricsApi};
use tracing::debug;

use crate::types::Scope;
use crate::{DIMENSION_LOAD_BALANCER, DIMENSION_TARGET_GROUP, NAMESPACE, RESPONSE_TIME_METRIC};

/// Discover the target groups behind the scoped load balancer, or every
/// target group in the account when unscoped.
///
/// Catalog order is preserved and duplicates are kept; a duplicate entry
/// just means the collector queries that group redundantly. Any API error
/// is surfaced unmodified and is fatal to startup.
pub async fn discover_target_groups<C: MetricsApi>(
    api: &C,
    scope: &Scope,
) -> Result<Vec<String>, CloudWatchError> {
    let mut dimensions = vec![DimensionFilter::name_only(DIMENSION_TARGET_GROUP)];
    if let Some(name) = scope.load_balancer() {
        dimensions.push(DimensionFilter::with_value(DIMENSION_LOAD_BALANCER, name));
    }

    let request = ListMetricsRequest {
        namespace: NAMESPACE.to_string(),
        metric_name: RESPONSE_TIME_METRIC.to_string(),
        dimensions,
    };
    let metrics = api.list_metrics(&request).await?;

    let mut target_groups = Vec::with_capacity(metrics.len());
    for metric in metrics {
        // Metrics with extra or missing dimensions belong to a different
        // variant of the response-time metric
        if metric.dimensions.len() != 2 {
            continue;
        }
        for dimension in metric.dimensions {
            if dimension.name == DIMENSION_TARGET_GROUP {
                target_groups.push(dimension.value);
            }
        }
    }

    debug!(count = target_groups.len(), "discovered target groups");
    Ok(target_groups)
}
