// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the gatewaydns controller.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for all gatewaydns CRDs
pub const API_GROUP: &str = "gatewaydns.io";

/// API version for all gatewaydns CRDs
pub const API_VERSION: &str = "v1alpha1";

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "gatewaydns.io/v1alpha1";

/// Kind name for `DNSPolicy` resource
pub const KIND_DNS_POLICY: &str = "DNSPolicy";

/// Kind name for `DNSRecord` resource
pub const KIND_DNS_RECORD: &str = "DNSRecord";

/// Kind name for `DNSHealthCheckProbe` resource
pub const KIND_DNS_HEALTH_CHECK_PROBE: &str = "DNSHealthCheckProbe";

/// Kind name for `ManagedZone` resource
pub const KIND_MANAGED_ZONE: &str = "ManagedZone";

// ============================================================================
// Gateway API Constants
// ============================================================================

/// API group of the Gateway API
pub const GATEWAY_API_GROUP: &str = "gateway.networking.k8s.io";

/// Kind name for the Gateway API `Gateway` resource
pub const KIND_GATEWAY: &str = "Gateway";

/// Standard single-cluster IP address type
pub const ADDRESS_TYPE_IP: &str = "IPAddress";

/// Standard single-cluster hostname address type
pub const ADDRESS_TYPE_HOSTNAME: &str = "Hostname";

/// Multi-cluster IP address type; value is `<cluster>/<ip>`
pub const ADDRESS_TYPE_MULTI_CLUSTER_IP: &str = "gatewaydns.io/MultiClusterIPAddress";

/// Multi-cluster hostname address type; value is `<cluster>/<hostname>`
pub const ADDRESS_TYPE_MULTI_CLUSTER_HOSTNAME: &str = "gatewaydns.io/MultiClusterHostnameAddress";

/// Separator between cluster name and address in multi-cluster address values
pub const CLUSTER_ADDRESS_SEPARATOR: char = '/';

/// Separator between cluster name and listener name in multi-cluster listener status
pub const CLUSTER_LISTENER_SEPARATOR: char = '.';

/// Cluster name used for a Gateway that reports plain single-cluster status
pub const LOCAL_CLUSTER_NAME: &str = "local";

// ============================================================================
// DNS Record Constants
// ============================================================================

/// TTL for address (A/AAAA) endpoints
pub const DEFAULT_TTL_SECS: i64 = 60;

/// TTL for CNAME endpoints in the load-balanced tree
pub const DEFAULT_CNAME_TTL_SECS: i64 = 300;

/// Weight assigned to a cluster when no custom weight matches
pub const DEFAULT_LOAD_BALANCING_WEIGHT: i64 = 120;

/// Prefix of the load-balancer name in the load-balanced CNAME tree
pub const LB_NAME_PREFIX: &str = "lb-";

/// Set identifier of the catch-all geo endpoint
pub const DEFAULT_GEO_SET_IDENTIFIER: &str = "default";

/// Geo code of the catch-all geo endpoint
pub const WILDCARD_GEO_CODE: &str = "*";

/// Provider-specific property carrying an endpoint weight
pub const PROVIDER_PROPERTY_WEIGHT: &str = "weight";

/// Provider-specific property carrying an endpoint geo code
pub const PROVIDER_PROPERTY_GEO_CODE: &str = "geo-code";

/// Endpoint label carrying the originating cluster name
pub const ENDPOINT_LABEL_CLUSTER: &str = "cluster";

/// Number of hex characters kept from a name hash
pub const SHORT_HASH_LEN: usize = 8;

/// Maximum length of a Kubernetes object name
pub const MAX_OBJECT_NAME_LEN: usize = 253;

// ============================================================================
// Health Check Constants
// ============================================================================

/// Default probe path
pub const DEFAULT_HEALTH_CHECK_PATH: &str = "/";

/// Default probe port
pub const DEFAULT_HEALTH_CHECK_PORT: i32 = 80;

/// Default probe protocol
pub const DEFAULT_HEALTH_CHECK_PROTOCOL: &str = "HTTP";

/// Default number of consecutive failures before an endpoint is unhealthy
pub const DEFAULT_HEALTH_CHECK_FAILURE_THRESHOLD: i32 = 5;

/// Default interval between probes
pub const DEFAULT_HEALTH_CHECK_INTERVAL_SECS: i64 = 60;

// ============================================================================
// Controller Error Handling Constants
// ============================================================================

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Requeue duration for a policy whose Ready condition is True (5 minutes)
pub const READY_REQUEUE_DURATION_SECS: u64 = 300;

/// Requeue duration for a policy whose Ready condition is not True
pub const NOT_READY_REQUEUE_DURATION_SECS: u64 = 15;

/// Field manager recorded on every write
pub const FIELD_MANAGER: &str = "gatewaydns-controller";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

