//! Plugin configuration
//!
//! Read once from the environment at startup; the host agent sets these in
//! the plugin's command block.

use thiserror::Error;

const DEFAULT_PREFIX: &str = "alb";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together")]
    PartialCredentials,
}

#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Region; resolved from instance metadata when unset
    pub region: Option<String>,
    /// Monitoring endpoint override
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Load balancer to scope to; unset means account-wide collection
    pub load_balancer: Option<String>,
    /// Metric key prefix
    pub prefix: String,
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.is_empty())
}

impl PluginConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_key_id = non_empty("AWS_ACCESS_KEY_ID");
        let secret_access_key = non_empty("AWS_SECRET_ACCESS_KEY");
        if access_key_id.is_some() != secret_access_key.is_some() {
            return Err(ConfigError::PartialCredentials);
        }

        Ok(Self {
            region: non_empty("AWS_REGION"),
            endpoint: non_empty("CLOUDWATCH_ENDPOINT"),
            access_key_id,
            secret_access_key,
            load_balancer: non_empty("ALB_LOAD_BALANCER_NAME"),
            prefix: non_empty("METRIC_KEY_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        })
    }
}
