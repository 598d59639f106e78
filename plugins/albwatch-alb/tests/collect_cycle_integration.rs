//! Full collection cycle against a mock monitoring API
//!
//! Discovery feeds the collector, and the snapshot carries exactly the
//! keys the agent expects.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use albwatch_cloudwatch::{
    CloudWatchError, Datapoint, Dimension, ListMetricsRequest, Metric, MetricsApi,
    StatisticsRequest,
};
use albwatch_lb_latency::{
    discover_target_groups, CollectError, LatencyCollector, Scope, PERCENTILES,
};

const LB: &str = "app/my-lb/abc123";
const TG_A: &str = "targetgroup/tg-a/111";
const TG_B: &str = "targetgroup/tg-b/222";

/// Mock API: a fixed catalog plus per-target-group datapoint sets, with
/// every request recorded
struct MockMonitoringApi {
    catalog: Vec<Metric>,
    /// Keyed by TargetGroup dimension value; `None` is the aggregate query
    datapoints: HashMap<Option<String>, Vec<Datapoint>>,
    listing_requests: Arc<Mutex<Vec<ListMetricsRequest>>>,
    statistics_requests: Arc<Mutex<Vec<StatisticsRequest>>>,
}

impl MockMonitoringApi {
    fn new(catalog: Vec<Metric>, datapoints: HashMap<Option<String>, Vec<Datapoint>>) -> Self {
        Self {
            catalog,
            datapoints,
            listing_requests: Arc::new(Mutex::new(Vec::new())),
            statistics_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl MetricsApi for MockMonitoringApi {
    async fn list_metrics(
        &self,
        request: &ListMetricsRequest,
    ) -> Result<Vec<Metric>, CloudWatchError> {
        self.listing_requests.lock().unwrap().push(request.clone());
        Ok(self.catalog.clone())
    }

    async fn get_metric_statistics(
        &self,
        request: &StatisticsRequest,
    ) -> Result<Vec<Datapoint>, CloudWatchError> {
        self.statistics_requests.lock().unwrap().push(request.clone());
        let target_group = request
            .dimensions
            .iter()
            .find(|dimension| dimension.name == "TargetGroup")
            .map(|dimension| dimension.value.clone());
        Ok(self.datapoints.get(&target_group).cloned().unwrap_or_default())
    }
}

fn catalog_entry(target_group: &str) -> Metric {
    Metric {
        namespace: "AWS/ApplicationELB".to_string(),
        metric_name: "TargetResponseTime".to_string(),
        dimensions: vec![
            Dimension::new("TargetGroup", target_group),
            Dimension::new("LoadBalancer", LB),
        ],
    }
}

fn full_point(seconds_ago: i64, p99: f64) -> Datapoint {
    let mut extended_statistics: HashMap<String, f64> = PERCENTILES
        .iter()
        .map(|name| (name.to_string(), 10.0))
        .collect();
    extended_statistics.insert("p99".to_string(), p99);
    Datapoint {
        timestamp: Utc::now() - Duration::seconds(seconds_ago),
        extended_statistics,
    }
}

#[tokio::test]
async fn test_scoped_cycle_end_to_end() {
    let api = MockMonitoringApi::new(
        vec![catalog_entry(TG_A), catalog_entry(TG_B)],
        HashMap::from([
            (Some(TG_A.to_string()), vec![full_point(60, 120.5)]),
            (Some(TG_B.to_string()), vec![full_point(60, 88.0)]),
            (None, vec![full_point(60, 101.25)]),
        ]),
    );
    let scope = Scope::new(Some(LB.to_string()), "alb");

    let target_groups = discover_target_groups(&api, &scope).await.unwrap();
    assert_eq!(target_groups, vec![TG_A.to_string(), TG_B.to_string()]);

    let collector = LatencyCollector::new(api, scope);
    let snapshot = collector.collect(&target_groups).await.unwrap();

    assert_eq!(snapshot.get("alb.tg-a.p99"), Some(120.5));
    assert_eq!(snapshot.get("alb.tg-b.p99"), Some(88.0));
    assert_eq!(snapshot.get("alb.p99"), Some(101.25));
    // 5 percentiles for each of: tg-a, tg-b, aggregate; nothing else
    assert_eq!(snapshot.len(), 15);
}

#[tokio::test]
async fn test_unscoped_cycle_never_sends_load_balancer_dimension() {
    let api = MockMonitoringApi::new(
        vec![catalog_entry(TG_A)],
        HashMap::from([
            (Some(TG_A.to_string()), vec![full_point(60, 50.0)]),
            (None, vec![full_point(60, 60.0)]),
        ]),
    );
    let listing_requests = api.listing_requests.clone();
    let statistics_requests = api.statistics_requests.clone();
    let scope = Scope::new(None, "alb");

    let target_groups = discover_target_groups(&api, &scope).await.unwrap();
    let collector = LatencyCollector::new(api, scope);
    collector.collect(&target_groups).await.unwrap();

    // The listing filters on TargetGroup presence only
    let listings = listing_requests.lock().unwrap();
    assert_eq!(listings.len(), 1);
    assert!(listings[0]
        .dimensions
        .iter()
        .all(|filter| filter.name != "LoadBalancer"));
    assert!(!serde_json::to_string(&listings[0]).unwrap().contains("LoadBalancer"));

    // Neither the per-group nor the aggregate statistics query names the
    // load balancer
    let statistics = statistics_requests.lock().unwrap();
    assert_eq!(statistics.len(), 2);
    for request in statistics.iter() {
        assert!(request
            .dimensions
            .iter()
            .all(|dimension| dimension.name != "LoadBalancer"));
    }
    assert!(statistics[1].dimensions.is_empty());
}

#[tokio::test]
async fn test_failed_target_group_aborts_whole_cycle() {
    // tg-b has no datapoints; the cycle must fail without a snapshot
    let api = MockMonitoringApi::new(
        vec![catalog_entry(TG_A), catalog_entry(TG_B)],
        HashMap::from([
            (Some(TG_A.to_string()), vec![full_point(60, 120.5)]),
            (None, vec![full_point(60, 101.25)]),
        ]),
    );
    let scope = Scope::new(Some(LB.to_string()), "alb");

    let target_groups = discover_target_groups(&api, &scope).await.unwrap();
    let collector = LatencyCollector::new(api, scope);

    let result = collector.collect(&target_groups).await;
    assert!(matches!(
        result,
        Err(CollectError::NoData { target }) if target == TG_B
    ));
}
