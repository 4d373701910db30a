// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Controller configuration.
//!
//! Every option can be given as a command-line flag or through the matching
//! environment variable. Values not set by either fall back to the defaults in
//! [`crate::constants`]. Logging stays environment-driven (`RUST_LOG`,
//! `RUST_LOG_FORMAT`).
//!
//! # Example
//!
//! ```bash
//! DEFAULT_GEO=IE gatewaydns --metrics-bind-address 0.0.0.0:9090
//! ```

use crate::constants::{
    DEFAULT_CNAME_TTL_SECS, DEFAULT_LOAD_BALANCING_WEIGHT, DEFAULT_TTL_SECS,
    ERROR_REQUEUE_DURATION_SECS, NOT_READY_REQUEUE_DURATION_SECS, READY_REQUEUE_DURATION_SECS,
};
use clap::Parser;

/// Default listen address of the metrics server
pub const DEFAULT_METRICS_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Runtime configuration of the `DNSPolicy` controller.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "gatewaydns", version, about = "DNSPolicy controller for Gateway API gateways")]
pub struct Config {
    /// Only watch objects in this namespace. Watches all namespaces when unset.
    #[arg(long, env = "WATCH_NAMESPACE")]
    pub watch_namespace: Option<String>,

    /// `host:port` the metrics server listens on.
    #[arg(long, env = "METRICS_BIND_ADDRESS", default_value = DEFAULT_METRICS_BIND_ADDRESS)]
    pub metrics_bind_address: String,

    /// Seconds before a Ready policy is reconciled again.
    #[arg(long, env = "REQUEUE_READY_SECS", default_value_t = READY_REQUEUE_DURATION_SECS)]
    pub requeue_ready_secs: u64,

    /// Seconds before a policy that is not Ready is reconciled again.
    #[arg(long, env = "REQUEUE_NOT_READY_SECS", default_value_t = NOT_READY_REQUEUE_DURATION_SECS)]
    pub requeue_not_ready_secs: u64,

    /// Seconds before a failed reconciliation is retried.
    #[arg(long, env = "ERROR_REQUEUE_SECS", default_value_t = ERROR_REQUEUE_DURATION_SECS)]
    pub error_requeue_secs: u64,

    /// TTL of address records.
    #[arg(long, env = "DEFAULT_TTL", default_value_t = DEFAULT_TTL_SECS)]
    pub default_ttl: i64,

    /// TTL of the CNAME records forming the load-balancing tree.
    #[arg(long, env = "DEFAULT_CNAME_TTL", default_value_t = DEFAULT_CNAME_TTL_SECS)]
    pub default_cname_ttl: i64,

    /// Weight of a cluster when the policy sets none.
    #[arg(long, env = "DEFAULT_WEIGHT", default_value_t = DEFAULT_LOAD_BALANCING_WEIGHT)]
    pub default_weight: i64,

    /// Geo of a cluster when the policy sets none.
    #[arg(long, env = "DEFAULT_GEO")]
    pub default_geo: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_namespace: None,
            metrics_bind_address: DEFAULT_METRICS_BIND_ADDRESS.to_string(),
            requeue_ready_secs: READY_REQUEUE_DURATION_SECS,
            requeue_not_ready_secs: NOT_READY_REQUEUE_DURATION_SECS,
            error_requeue_secs: ERROR_REQUEUE_DURATION_SECS,
            default_ttl: DEFAULT_TTL_SECS,
            default_cname_ttl: DEFAULT_CNAME_TTL_SECS,
            default_weight: DEFAULT_LOAD_BALANCING_WEIGHT,
            default_geo: None,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
