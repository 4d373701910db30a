// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions (CRDs) for Gateway DNS management.
//!
//! This module defines the Kubernetes Custom Resource Definitions owned by gatewaydns,
//! plus a typed view of the Gateway API `Gateway` the policies bind to.
//!
//! # Resource Types
//!
//! ## Policy
//!
//! - [`DNSPolicy`] - Binds a Gateway and declares how its listeners are published in DNS
//!
//! ## Derived
//!
//! - [`DNSRecord`] - Desired endpoints for one (Gateway, listener) pair
//! - [`DNSHealthCheckProbe`] - Health probe for one (address, host) pair
//!
//! ## Inputs
//!
//! - [`ManagedZone`] - An administratively declared DNS domain root
//! - [`Gateway`] - The Gateway API object a policy targets (not owned by this crate)
//!
//! # Example: Creating a DNS Policy
//!
//! ```rust,no_run
//! use gatewaydns::crd::{DNSPolicySpec, PolicyTargetReference, RoutingStrategy};
//!
//! let spec = DNSPolicySpec {
//!     target_ref: PolicyTargetReference {
//!         group: "gateway.networking.k8s.io".to_string(),
//!         kind: "Gateway".to_string(),
//!         name: "prod-web".to_string(),
//!     },
//!     routing_strategy: RoutingStrategy::Simple,
//!     load_balancing: None,
//!     health_check: None,
//! };
//! ```

use crate::constants::GATEWAY_API_GROUP;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Condition represents an observation of a resource's current state.
///
/// Serialized in the `metav1.Condition` shape so the same type can be used for the
/// policy's own status and for the condition mirrored onto the Gateway.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition, e.g. `Ready` or `DNSPolicyAffected`.
    pub r#type: String,

    /// Status of the condition: True, False, or Unknown.
    pub status: String,

    /// Brief CamelCase reason for the condition's last transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message indicating details about the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last time the condition transitioned from one status to another (RFC3339 format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,

    /// Generation of the object this condition was computed for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

// ============================================================================
// DNSPolicy
// ============================================================================

/// Reference to the object a policy targets. Always resolved in the policy's namespace.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTargetReference {
    /// API group of the target. Defaults to `gateway.networking.k8s.io`.
    #[serde(default = "default_target_group")]
    pub group: String,

    /// Kind of the target. Only `Gateway` is DNS-capable.
    pub kind: String,

    /// Name of the target in the policy's namespace.
    pub name: String,
}

fn default_target_group() -> String {
    GATEWAY_API_GROUP.to_string()
}

/// How the endpoints of a listener are composed into DNS answers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum RoutingStrategy {
    /// One flat answer containing every cluster's addresses.
    #[serde(rename = "simple")]
    Simple,

    /// A weighted, geo-aware CNAME tree grouped by originating cluster.
    #[default]
    #[serde(rename = "loadbalanced", alias = "load-balanced")]
    LoadBalanced,
}

/// Weight assigned to a set of clusters.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomWeight {
    /// Cluster names this weight applies to.
    pub clusters: Vec<String>,

    /// Relative weight of each listed cluster.
    #[schemars(range(min = 0))]
    pub weight: i64,
}

/// Weighting policy for the load-balanced strategy.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancingWeighted {
    /// Weight of clusters not matched by any custom entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_weight: Option<i64>,

    /// Custom weights. The first entry listing a cluster wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom: Vec<CustomWeight>,
}

/// Geo assigned to a set of clusters.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomGeo {
    /// Cluster names located in this geo.
    pub clusters: Vec<String>,

    /// Geo code, e.g. `IE` or `US`.
    pub geo: String,
}

/// Geo policy for the load-balanced strategy.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancingGeo {
    /// Geo of clusters not matched by any custom entry. Also the catch-all answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_geo: Option<String>,

    /// Custom geo assignments. The first entry listing a cluster wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom: Vec<CustomGeo>,
}

/// Load-balancing configuration, only read for [`RoutingStrategy::LoadBalanced`].
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancingSpec {
    /// Per-cluster weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted: Option<LoadBalancingWeighted>,

    /// Per-cluster geos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<LoadBalancingGeo>,
}

/// Health check configuration. When absent no probes are created.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckSpec {
    /// Path requested on each address. Defaults to `/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Port probed on each address. Defaults to 80.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 65535))]
    pub port: Option<i32>,

    /// `HTTP` or `HTTPS`. Defaults to `HTTP`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Consecutive failures before the address is considered unhealthy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<i32>,

    /// Seconds between probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<i64>,

    /// Accept self-signed certificates for `HTTPS` probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_insecure_certificates: Option<bool>,
}

/// `DNSPolicy` binds a Gateway and publishes its in-zone listeners in DNS.
///
/// # Example
///
/// ```yaml
/// apiVersion: gatewaydns.io/v1alpha1
/// kind: DNSPolicy
/// metadata:
///   name: prod-web
///   namespace: multi-cluster-gateways
/// spec:
///   targetRef:
///     group: gateway.networking.k8s.io
///     kind: Gateway
///     name: prod-web
///   routingStrategy: loadbalanced
///   loadBalancing:
///     weighted:
///       defaultWeight: 120
///     geo:
///       defaultGeo: IE
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "gatewaydns.io",
    version = "v1alpha1",
    kind = "DNSPolicy",
    namespaced,
    shortname = "dnspolicy",
    doc = "DNSPolicy binds a Gateway and keeps DNSRecords for its in-zone listeners consistent with the Gateway's multi-cluster status.",
    printcolumn = r#"{"name":"Target","type":"string","jsonPath":".spec.targetRef.name"}"#,
    printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#
)]
#[kube(status = "DNSPolicyStatus")]
#[serde(rename_all = "camelCase")]
pub struct DNSPolicySpec {
    /// The Gateway this policy binds.
    pub target_ref: PolicyTargetReference,

    /// `simple` or `loadbalanced`. Defaults to `loadbalanced`.
    #[serde(default)]
    pub routing_strategy: RoutingStrategy,

    /// Weights and geos for the load-balanced strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancing: Option<LoadBalancingSpec>,

    /// Health checks for every published (address, host) pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheckSpec>,
}

/// `DNSPolicy` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DNSPolicyStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

// ============================================================================
// DNSRecord
// ============================================================================

/// Provider-specific endpoint property such as a weight or geo code.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProviderSpecificProperty {
    pub name: String,
    pub value: String,
}

/// A single DNS answer set, in the shape used by external-dns.
#[derive(
    Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully qualified name of the answer.
    pub dns_name: String,

    /// Answer values (addresses or a CNAME target).
    #[serde(default)]
    pub targets: Vec<String>,

    /// `A`, `AAAA` or `CNAME`.
    pub record_type: String,

    /// Distinguishes answers sharing a `dnsName` (weighted or geo routing).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,

    /// TTL in seconds.
    #[serde(rename = "recordTTL", default, skip_serializing_if = "Option::is_none")]
    pub record_ttl: Option<i64>,

    /// Free-form labels, e.g. the originating cluster.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Provider-specific routing properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

/// Reference to a `ManagedZone` in the record's namespace.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ManagedZoneReference {
    pub name: String,
}

/// `DNSRecord` holds the desired endpoints for one (Gateway, listener) pair.
///
/// Created, updated and deleted only by the `DNSPolicy` reconciler. Deleting a
/// `DNSRecord` is the signal for the publisher to retract its provider records.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "gatewaydns.io",
    version = "v1alpha1",
    kind = "DNSRecord",
    namespaced,
    doc = "DNSRecord holds the desired DNS endpoints for one Gateway listener. It is derived from a DNSPolicy and consumed by a DNS publisher.",
    printcolumn = r#"{"name":"Gateway","type":"string","jsonPath":".spec.targetRef.name"}"#,
    printcolumn = r#"{"name":"Listener","type":"string","jsonPath":".spec.listenerName"}"#
)]
#[kube(status = "DNSRecordStatus")]
#[serde(rename_all = "camelCase")]
pub struct DNSRecordSpec {
    /// Zone the endpoints are published in.
    pub managed_zone: ManagedZoneReference,

    /// The Gateway the endpoints were derived from.
    pub target_ref: PolicyTargetReference,

    /// The Gateway listener the endpoints were derived from.
    pub listener_name: String,

    /// Complete desired endpoint set. Replaced wholesale on every change.
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// `DNSRecord` status, written by the publisher.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DNSRecordStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

// ============================================================================
// DNSHealthCheckProbe
// ============================================================================

/// `DNSHealthCheckProbe` checks one address for one host.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "gatewaydns.io",
    version = "v1alpha1",
    kind = "DNSHealthCheckProbe",
    namespaced,
    doc = "DNSHealthCheckProbe describes a health check of one Gateway address for one listener host.",
    printcolumn = r#"{"name":"Address","type":"string","jsonPath":".spec.address"}"#,
    printcolumn = r#"{"name":"Host","type":"string","jsonPath":".spec.host"}"#,
    printcolumn = r#"{"name":"Healthy","type":"boolean","jsonPath":".status.healthy"}"#
)]
#[kube(status = "DNSHealthCheckProbeStatus")]
#[serde(rename_all = "camelCase")]
pub struct DNSHealthCheckProbeSpec {
    /// Address being probed.
    pub address: String,

    /// Host header / SNI name used for the probe.
    pub host: String,

    /// Port probed.
    pub port: i32,

    /// Path requested.
    pub path: String,

    /// `HTTP` or `HTTPS`.
    pub protocol: String,

    /// Seconds between probes.
    pub interval_seconds: i64,

    /// Consecutive failures before the address is considered unhealthy.
    pub failure_threshold: i32,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub allow_insecure_certificate: bool,
}

/// `DNSHealthCheckProbe` status, written by the prober.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DNSHealthCheckProbeStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consecutive_failures: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked_at: Option<String>,
}

// ============================================================================
// ManagedZone
// ============================================================================

/// `ManagedZone` declares a DNS domain root listeners may be published under.
///
/// # Example
///
/// ```yaml
/// apiVersion: gatewaydns.io/v1alpha1
/// kind: ManagedZone
/// metadata:
///   name: mz-example-com
/// spec:
///   domainName: example.com
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "gatewaydns.io",
    version = "v1alpha1",
    kind = "ManagedZone",
    namespaced,
    doc = "ManagedZone is a DNS domain root. Only Gateway listeners whose host falls inside a ManagedZone are published.",
    printcolumn = r#"{"name":"Domain","type":"string","jsonPath":".spec.domainName"}"#
)]
#[kube(status = "ManagedZoneStatus")]
#[serde(rename_all = "camelCase")]
pub struct ManagedZoneSpec {
    /// Domain root, e.g. `example.com`.
    #[schemars(regex(
        pattern = r"^([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)*[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$"
    ))]
    pub domain_name: String,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `ManagedZone` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManagedZoneStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

// ============================================================================
// Gateway (gateway.networking.k8s.io/v1, read-mostly view)
// ============================================================================

/// A Gateway listener as declared in `spec.listeners`.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listener {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub port: i32,
    pub protocol: String,
}

/// An address reported in `status.addresses`.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GatewayStatusAddress {
    /// Address type. Absent means `IPAddress`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    pub value: String,
}

/// Group/kind of a route a listener supports.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RouteGroupKind {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub kind: String,
}

/// A listener status entry. In multi-cluster status the name is `<cluster>.<listener>`.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListenerStatus {
    pub name: String,
    #[serde(default)]
    pub supported_kinds: Vec<RouteGroupKind>,
    #[serde(default)]
    pub attached_routes: i32,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Observed Gateway status, aggregated across clusters by the placement mechanism.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
pub struct GatewayStatus {
    #[serde(default)]
    pub addresses: Vec<GatewayStatusAddress>,
    #[serde(default)]
    pub listeners: Vec<ListenerStatus>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// The subset of a Gateway API `Gateway` the reconciler reads.
///
/// The reconciler only ever writes the back-reference annotations and the
/// `DNSPolicyAffected` status condition, both through merge patches.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "gateway.networking.k8s.io",
    version = "v1",
    kind = "Gateway",
    namespaced
)]
#[kube(status = "GatewayStatus")]
#[serde(rename_all = "camelCase")]
pub struct GatewaySpec {
    pub gateway_class_name: String,
    #[serde(default)]
    pub listeners: Vec<Listener>,
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;
