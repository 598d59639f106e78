//! Collection scope and snapshot types

use serde::Serialize;
use std::collections::BTreeMap;

/// Immutable collection scope
///
/// Holds the optional load-balancer identifier and the metric-key prefix.
/// Supplied once at startup; an absent load balancer means account-wide,
/// unscoped collection.
#[derive(Debug, Clone)]
pub struct Scope {
    load_balancer: Option<String>,
    prefix: String,
}

impl Scope {
    pub fn new(load_balancer: Option<String>, prefix: &str) -> Self {
        Self {
            load_balancer,
            prefix: prefix.to_string(),
        }
    }

    pub fn load_balancer(&self) -> Option<&str> {
        self.load_balancer.as_deref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Snapshot key for a load-balancer-level percentile
    pub fn aggregate_key(&self, percentile: &str) -> String {
        format!("{}.{}", self.prefix, percentile)
    }

    /// Snapshot key for a per-target-group percentile
    pub fn target_group_key(&self, short_name: &str, percentile: &str) -> String {
        format!("{}.{}.{}", self.prefix, short_name, percentile)
    }
}

/// Short display name of a target group: the middle path segment of the
/// `targetgroup/<name>/<hash>` identifier. A malformed identifier falls
/// back to itself.
pub fn short_target_group_name(id: &str) -> &str {
    id.split('/').nth(1).filter(|name| !name.is_empty()).unwrap_or(id)
}

/// Flat metric mapping produced by one collection cycle
///
/// Keys carry the configured prefix; iteration order is the sorted key
/// order, so emission is deterministic run to run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricSnapshot(BTreeMap<String, f64>);

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: f64) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }
}
