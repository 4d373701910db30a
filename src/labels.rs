// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common label and annotation constants used across the `DNSPolicy` reconciler.
//!
//! Labels on derived `DNSRecord` and `DNSHealthCheckProbe` objects identify the
//! policy and Gateway that produced them so teardown can select them without
//! needing the Gateway object. Annotations on the Gateway are the back-references
//! to the binding policies.

// ============================================================================
// Kubernetes Standard Labels
// https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
// ============================================================================

/// Standard label for the tool being used to manage the operation of an application
pub const K8S_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Standard label for the name of a higher-level application this one is part of
pub const K8S_PART_OF: &str = "app.kubernetes.io/part-of";

/// Value for `app.kubernetes.io/part-of` on everything gatewaydns creates
pub const PART_OF_GATEWAYDNS: &str = "gatewaydns";

/// Value for `app.kubernetes.io/managed-by` on objects derived from a `DNSPolicy`
pub const MANAGED_BY_DNS_POLICY: &str = "DNSPolicy";

// ============================================================================
// Back-Reference Annotations (on the Gateway)
// ============================================================================

/// Single-value back-reference: `<namespace>/<name>` of the primary policy.
///
/// Also used as the label key carrying the policy name on derived objects.
pub const DNS_POLICY_BACK_REF_ANNOTATION: &str = "gatewaydns.io/dnspolicy";

/// JSON array of `{name, namespace}` for every policy referencing the Gateway
pub const DNS_POLICIES_BACK_REF_ANNOTATION: &str = "gatewaydns.io/dnspolicies";

// ============================================================================
// Derived Object Labels
// ============================================================================

/// Label carrying the policy name on derived objects
pub const LABEL_POLICY_NAME: &str = DNS_POLICY_BACK_REF_ANNOTATION;

/// Label carrying the policy namespace on derived objects
pub const LABEL_POLICY_NAMESPACE: &str = "gatewaydns.io/dnspolicy-namespace";

/// Label carrying the Gateway name on derived objects
pub const LABEL_GATEWAY_NAME: &str = "gatewaydns.io/gateway";

/// Label carrying the Gateway namespace on derived objects
pub const LABEL_GATEWAY_NAMESPACE: &str = "gatewaydns.io/gateway-namespace";

/// Label carrying the listener name on a `DNSRecord`
pub const LABEL_LISTENER_NAME: &str = "gatewaydns.io/listener";

// ============================================================================
// Finalizers
// ============================================================================

/// Finalizer for `DNSPolicy` resources
pub const FINALIZER_DNS_POLICY: &str = "gatewaydns.io/dns-policy";
