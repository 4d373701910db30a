// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Standard Kubernetes status condition types and reasons for gatewaydns resources.
//!
//! Reasons are programmatic identifiers in CamelCase that explain why a condition has
//! a particular status.
//!
//! # Conditions Written
//!
//! - `DNSPolicy` → `type: Ready`, one of the three reasons below.
//! - `Gateway` → `type: DNSPolicyAffected`, `True`/`Accepted` while at least one
//!   policy binds it; removed when the last policy unbinds.
//!
//! # Example Status
//!
//! ```yaml
//! status:
//!   observedGeneration: 3
//!   conditions:
//!     - type: Ready
//!       status: "False"
//!       reason: ReconciliationError
//!       message: "gateway is invalid: inconsistent status addresses"
//!       observedGeneration: 3
//! ```

// ============================================================================
// Condition Types
// ============================================================================

/// Encompassing readiness condition on a `DNSPolicy`
pub const CONDITION_TYPE_READY: &str = "Ready";

/// Condition mirrored onto a Gateway while a `DNSPolicy` binds it
pub const CONDITION_TYPE_DNS_POLICY_AFFECTED: &str = "DNSPolicyAffected";

// ============================================================================
// Condition Status Values
// ============================================================================

/// Condition status `True`
pub const STATUS_TRUE: &str = "True";

/// Condition status `False`
pub const STATUS_FALSE: &str = "False";

// ============================================================================
// DNSPolicy Ready Reasons
// ============================================================================

/// The target does not exist, is being deleted, or is not a DNS-capable kind.
///
/// All derived state is torn down while this reason is reported.
pub const REASON_TARGET_NOT_FOUND: &str = "TargetNotFound";

/// The target was found but its status could not be used.
///
/// The message carries the validator's error text. No records are synthesized.
pub const REASON_RECONCILIATION_ERROR: &str = "ReconciliationError";

/// The policy is bound and DNS is enabled for the Gateway.
///
/// Reported both when records were synthesized and when the Gateway has no
/// status yet (nothing to publish).
pub const REASON_GATEWAY_DNS_ENABLED: &str = "GatewayDNSEnabled";

// ============================================================================
// Gateway Condition Reasons
// ============================================================================

/// The policy has been accepted and affects the Gateway
pub const REASON_ACCEPTED: &str = "Accepted";

/// Message for the `DNSPolicyAffected` condition
pub const MESSAGE_POLICY_AFFECTED: &str = "Object affected by DNSPolicy";
