//! Monitoring query SDK for CloudWatch-compatible endpoints
//!
//! This crate provides:
//! - The [`MetricsApi`] trait: the two read operations the collectors need
//!   (metric catalog listings and extended percentile statistics)
//! - [`CloudWatchClient`]: an HTTP implementation speaking the CloudWatch
//!   JSON protocol
//! - The wire types shared by both

pub mod client;
pub mod error;
pub mod types;

pub use client::{resolve_region, CloudWatchClient, CloudWatchConfig, MetricsApi};
pub use error::{CloudWatchError, Result};
pub use types::{
    Datapoint, Dimension, DimensionFilter, ListMetricsRequest, Metric, StatisticsRequest,
};
