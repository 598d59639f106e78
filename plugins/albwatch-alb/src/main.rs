//! ALB latency plugin
//!
//! One invocation is one collection cycle: discover the target groups
//! behind the configured load balancer, fetch the latest response-time
//! percentiles for the load balancer and each group, and print the flat
//! metric lines for the host agent. Logs go to stderr; stdout belongs to
//! the agent.

use anyhow::Context;
use chrono::Utc;
use tracing::info;

mod config;
mod output;

use albwatch_cloudwatch::{resolve_region, CloudWatchClient, CloudWatchConfig};
use albwatch_lb_latency::{discover_target_groups, graph_definitions, LatencyCollector, Scope};
use config::PluginConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("albwatch_alb=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = PluginConfig::from_env()?;

    // Definition negotiation: print the graph document and exit
    if std::env::var(output::PLUGIN_META_ENV).is_ok_and(|value| !value.is_empty()) {
        let graphs = graph_definitions(&config.prefix);
        output::write_definitions(&mut std::io::stdout().lock(), &graphs)?;
        return Ok(());
    }

    let region = match config.region.clone() {
        Some(region) => Some(region),
        None => resolve_region().await,
    };

    let client = CloudWatchClient::new(CloudWatchConfig {
        region: region.unwrap_or_default(),
        endpoint: config.endpoint.clone(),
        access_key_id: config.access_key_id.clone(),
        secret_access_key: config.secret_access_key.clone(),
    })?;

    let scope = Scope::new(config.load_balancer.clone(), &config.prefix);

    let target_groups = discover_target_groups(&client, &scope)
        .await
        .context("target group discovery failed")?;
    info!(
        count = target_groups.len(),
        load_balancer = config.load_balancer.as_deref().unwrap_or("<unscoped>"),
        "discovered target groups"
    );

    let collector = LatencyCollector::new(client, scope);
    let snapshot = collector
        .collect(&target_groups)
        .await
        .context("collection cycle failed")?;

    output::write_snapshot(&mut std::io::stdout().lock(), &snapshot, Utc::now())?;
    Ok(())
}
