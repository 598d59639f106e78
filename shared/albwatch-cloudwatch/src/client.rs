//! Monitoring query client
//!
//! Implements the two read operations of the monitoring API over the
//! CloudWatch-compatible JSON protocol. Request signing, retries, and
//! pagination belong to the deployment, not this client; errors surface
//! unmodified.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CloudWatchError, Result};
use crate::types::{Datapoint, ListMetricsRequest, Metric, StatisticsRequest};

/// Target prefix of the CloudWatch JSON protocol
const TARGET_PREFIX: &str = "GraniteServiceVersion20100801";
const CONTENT_TYPE: &str = "application/x-amz-json-1.0";

/// Instance metadata path used for region fallback
const IMDS_REGION_URL: &str = "http://169.254.169.254/latest/meta-data/placement/region";

/// Read-only monitoring query interface
#[async_trait]
pub trait MetricsApi: Send + Sync {
    /// List metrics matching namespace, metric name, and dimension filters
    async fn list_metrics(&self, request: &ListMetricsRequest) -> Result<Vec<Metric>>;

    /// Get extended percentile statistics for a metric with the given
    /// dimensions, time range, and period
    async fn get_metric_statistics(&self, request: &StatisticsRequest) -> Result<Vec<Datapoint>>;
}

/// Client configuration
#[derive(Debug, Clone, Default)]
pub struct CloudWatchConfig {
    pub region: String,
    /// Endpoint override; defaults to the regional monitoring endpoint
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// Monitoring query client
pub struct CloudWatchClient {
    http: reqwest::Client,
    endpoint: String,
    credentials: Option<(String, String)>,
}

impl CloudWatchClient {
    /// Create a new client for the configured region or endpoint
    pub fn new(config: CloudWatchConfig) -> Result<Self> {
        if config.region.is_empty() && config.endpoint.is_none() {
            return Err(CloudWatchError::Config(
                "no region or endpoint configured".to_string(),
            ));
        }

        let endpoint = config
            .endpoint
            .unwrap_or_else(|| format!("https://monitoring.{}.amazonaws.com", config.region));

        let credentials = match (config.access_key_id, config.secret_access_key) {
            (Some(id), Some(secret)) => Some((id, secret)),
            (None, None) => None,
            _ => {
                return Err(CloudWatchError::Config(
                    "access key id and secret access key must be set together".to_string(),
                ))
            }
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CloudWatchError::Connection(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            credentials,
        })
    }

    async fn call<B, R>(&self, action: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!(action, endpoint = %self.endpoint, "monitoring API call");

        let mut request = self
            .http
            .post(&self.endpoint)
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, action))
            .header("Content-Type", CONTENT_TYPE)
            .json(body);

        if let Some((id, secret)) = &self.credentials {
            request = request.basic_auth(id, Some(secret));
        }

        let response = request
            .send()
            .await
            .map_err(|e| CloudWatchError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CloudWatchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| CloudWatchError::Decode(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ListMetricsResponse {
    #[serde(rename = "Metrics", default)]
    metrics: Vec<Metric>,
}

#[derive(Debug, Deserialize)]
struct StatisticsResponse {
    #[serde(rename = "Datapoints", default)]
    datapoints: Vec<Datapoint>,
}

#[async_trait]
impl MetricsApi for CloudWatchClient {
    async fn list_metrics(&self, request: &ListMetricsRequest) -> Result<Vec<Metric>> {
        let response: ListMetricsResponse = self.call("ListMetrics", request).await?;
        Ok(response.metrics)
    }

    async fn get_metric_statistics(&self, request: &StatisticsRequest) -> Result<Vec<Datapoint>> {
        let response: StatisticsResponse = self.call("GetMetricStatistics", request).await?;
        Ok(response.datapoints)
    }
}

/// Resolve the region from the instance metadata service
///
/// Returns `None` off-instance; callers fall back to explicit
/// configuration.
pub async fn resolve_region() -> Option<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
        .ok()?;

    match client.get(IMDS_REGION_URL).send().await {
        Ok(response) if response.status().is_success() => response
            .text()
            .await
            .ok()
            .map(|body| body.trim().to_string())
            .filter(|region| !region.is_empty()),
        Ok(response) => {
            warn!(status = %response.status(), "instance metadata returned no region");
            None
        }
        Err(e) => {
            debug!("instance metadata unavailable: {}", e);
            None
        }
    }
}
