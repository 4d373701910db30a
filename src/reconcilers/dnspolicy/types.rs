// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Types shared by the `DNSPolicy` reconciler components.

use crate::crd::{DNSPolicy, Gateway};
use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

/// Identity of a policy as stored in the Gateway's back-reference list annotation.
///
/// Serialized as `{"name": ..., "namespace": ...}`. Membership in the list is by
/// value equality of this pair.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PolicyReference {
    pub name: String,
    pub namespace: String,
}

impl PolicyReference {
    /// Reference to `policy`.
    #[must_use]
    pub fn of(policy: &DNSPolicy) -> Self {
        Self {
            name: policy.name_any(),
            namespace: policy.namespace().unwrap_or_default(),
        }
    }
}

impl fmt::Display for PolicyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Classification of a policy's target.
#[derive(Clone, Debug)]
pub enum TargetResolution {
    /// The Gateway exists, is not being deleted, and can carry DNS.
    Found(Box<Gateway>),
    /// Nothing usable was found. The message is written to the Ready condition.
    NotFound { message: String },
    /// The reference names a kind that is not DNS-capable.
    Unsupported { message: String },
}

impl TargetResolution {
    /// Message describing why the target is unusable, if it is.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Found(_) => None,
            Self::NotFound { message } | Self::Unsupported { message } => Some(message),
        }
    }
}

/// One address a cluster reports for a Gateway, with the cluster prefix removed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GatewayAddress {
    Ip(IpAddr),
    Hostname(String),
}

impl fmt::Display for GatewayAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => write!(f, "{ip}"),
            Self::Hostname(host) => f.write_str(host),
        }
    }
}

/// Everything one cluster contributes to a Gateway's aggregated status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterStatus {
    /// Cluster name (`local` for single-cluster status)
    pub cluster: String,
    /// Addresses in status order, duplicates removed
    pub addresses: Vec<GatewayAddress>,
    /// Listener name → attached route count
    pub listeners: BTreeMap<String, i32>,
}

impl ClusterStatus {
    /// Whether this cluster serves `listener` (has attached routes and addresses).
    #[must_use]
    pub fn serves(&self, listener: &str) -> bool {
        !self.addresses.is_empty() && self.listeners.get(listener).is_some_and(|n| *n > 0)
    }
}

/// A Gateway status that passed validation, partitioned by cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatedStatus {
    /// Whether the status used multi-cluster address types
    pub multi_cluster: bool,
    /// Per-cluster contributions keyed by cluster name
    pub clusters: BTreeMap<String, ClusterStatus>,
}

impl ValidatedStatus {
    /// Whether there is nothing to publish yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters
            .values()
            .all(|c| c.addresses.is_empty() || c.listeners.is_empty())
    }

    /// Clusters serving `listener`, in cluster-name order.
    #[must_use]
    pub fn clusters_serving(&self, listener: &str) -> Vec<&ClusterStatus> {
        self.clusters
            .values()
            .filter(|c| c.serves(listener))
            .collect()
    }
}

/// A Gateway listener selected for publishing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerTarget {
    /// Listener name from `spec.listeners`
    pub listener_name: String,
    /// Listener host, possibly a wildcard
    pub host: String,
    /// Name of the `ManagedZone` containing the host
    pub zone_name: String,
}

impl ListenerTarget {
    /// Whether the host is a wildcard (`*.example.com`).
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.host.starts_with("*.")
    }
}
