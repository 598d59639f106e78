//! Latency percentile collection
//!
//! One collection cycle issues one statistics query per discovered target
//! group plus one aggregate query, sequentially, and merges the latest
//! datapoint values into a flat snapshot.

use albwatch_cloudwatch::{CloudWatchError, Datapoint, Dimension, MetricsApi, StatisticsRequest};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::debug;

use crate::types::{short_target_group_name, MetricSnapshot, Scope};
use crate::{
    DIMENSION_LOAD_BALANCER, DIMENSION_TARGET_GROUP, NAMESPACE, PERCENTILES, RESPONSE_TIME_METRIC,
};

/// Trailing window per statistics query; wider than one period so at least
/// one datapoint lands inside it under normal reporting delay
const WINDOW_MINUTES: i64 = 3;

/// Statistics granularity in seconds
const PERIOD_SECONDS: u32 = 60;

/// Collection cycle errors
#[derive(Debug, Error)]
pub enum CollectError {
    /// The monitoring API failed or rejected a query
    #[error("monitoring query failed: {0}")]
    Query(#[from] CloudWatchError),

    /// A well-formed query returned no usable datapoints; reporting zero
    /// or a stale value instead would misrepresent the target's health
    #[error("fetched no datapoints for {target}")]
    NoData { target: String },
}

/// Collects response-time percentiles for one scope
pub struct LatencyCollector<C> {
    api: C,
    scope: Scope,
}

impl<C: MetricsApi> LatencyCollector<C> {
    pub fn new(api: C, scope: Scope) -> Self {
        Self { api, scope }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Run one collection cycle over the given target groups.
    ///
    /// The first query that errors or comes back empty aborts the whole
    /// cycle; a partial snapshot is never returned.
    pub async fn collect(&self, target_groups: &[String]) -> Result<MetricSnapshot, CollectError> {
        let mut snapshot = MetricSnapshot::new();

        for id in target_groups {
            let mut dimensions = vec![Dimension::new(DIMENSION_TARGET_GROUP, id)];
            if let Some(name) = self.scope.load_balancer() {
                dimensions.push(Dimension::new(DIMENSION_LOAD_BALANCER, name));
            }

            let short_name = short_target_group_name(id);
            for (percentile, value) in self.query_latest(dimensions, id).await? {
                snapshot.insert(self.scope.target_group_key(short_name, percentile), value);
            }
        }

        // Aggregate scope: no TargetGroup dimension, LoadBalancer only when
        // configured
        let mut dimensions = Vec::new();
        if let Some(name) = self.scope.load_balancer() {
            dimensions.push(Dimension::new(DIMENSION_LOAD_BALANCER, name));
        }
        let target = self.scope.load_balancer().unwrap_or(RESPONSE_TIME_METRIC);
        for (percentile, value) in self.query_latest(dimensions, target).await? {
            snapshot.insert(self.scope.aggregate_key(percentile), value);
        }

        debug!(keys = snapshot.len(), "collection cycle complete");
        Ok(snapshot)
    }

    /// Query the trailing window for one dimension set and reduce it to
    /// the latest value per percentile.
    async fn query_latest(
        &self,
        dimensions: Vec<Dimension>,
        target: &str,
    ) -> Result<Vec<(&'static str, f64)>, CollectError> {
        let now = Utc::now();
        let request = StatisticsRequest {
            namespace: NAMESPACE.to_string(),
            metric_name: RESPONSE_TIME_METRIC.to_string(),
            dimensions,
            start_time: now - Duration::minutes(WINDOW_MINUTES),
            end_time: now,
            period: PERIOD_SECONDS,
            extended_statistics: PERCENTILES.iter().map(|p| p.to_string()).collect(),
        };

        let datapoints = self.api.get_metric_statistics(&request).await?;
        if datapoints.is_empty() {
            return Err(CollectError::NoData {
                target: target.to_string(),
            });
        }

        let mut values = Vec::with_capacity(PERCENTILES.len());
        for percentile in PERCENTILES {
            let value =
                latest_value(&datapoints, percentile, now).ok_or_else(|| CollectError::NoData {
                    target: target.to_string(),
                })?;
            values.push((percentile, value));
        }
        Ok(values)
    }
}

/// Value of the latest datapoint not later than `now` that carries the
/// given statistic.
///
/// Reduced independently per statistic since different percentiles can
/// have different latest timestamps. Equal timestamps resolve to the last
/// datapoint in response order; the API does not guarantee datapoint
/// ordering, so a true tie is nondeterministic across runs.
fn latest_value(datapoints: &[Datapoint], statistic: &str, now: DateTime<Utc>) -> Option<f64> {
    let mut latest: Option<(DateTime<Utc>, f64)> = None;
    for point in datapoints {
        if point.timestamp > now {
            continue;
        }
        let value = match point.extended_statistics.get(statistic) {
            Some(value) => *value,
            None => continue,
        };
        match latest {
            Some((timestamp, _)) if point.timestamp < timestamp => {}
            _ => latest = Some((point.timestamp, value)),
        }
    }
    latest.map(|(_, value)| value)
}
