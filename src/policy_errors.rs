// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Domain error types for `DNSPolicy` reconciliation.
//!
//! This module provides specialized error types for:
//! - Gateway status validation (inconsistent or malformed multi-cluster status)
//! - Back-reference annotation corruption on the Gateway
//!
//! Validation errors are terminal for the current input: they are surfaced on the
//! policy's `Ready` condition and the pass completes without synthesizing records.
//! Back-reference corruption is a reconciliation error: it is reported on the same
//! condition and the policy is requeued on the not-ready interval.

use thiserror::Error;

/// Errors produced when a Gateway's aggregated multi-cluster status cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayValidationError {
    /// Both single-cluster and multi-cluster address types appear in `status.addresses`.
    #[error("gateway is invalid: inconsistent status addresses")]
    InconsistentAddresses,

    /// An address entry has a type that is neither single- nor multi-cluster.
    #[error("gateway is invalid: unknown address type '{address_type}'")]
    UnknownAddressType {
        /// The unrecognised address type
        address_type: String,
    },

    /// A multi-cluster address value is not of the form `<cluster>/<value>`.
    #[error("gateway is invalid: malformed multi-cluster address '{value}'")]
    MalformedAddress {
        /// The raw address value
        value: String,
    },
}

/// Errors in the back-reference annotations stored on a Gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackReferenceError {
    /// The policies annotation is not a JSON array of `{name, namespace}`.
    #[error("back-reference annotation '{annotation}' on gateway {namespace}/{gateway} is corrupted: {reason}")]
    Corrupted {
        /// The annotation key
        annotation: String,
        /// Gateway namespace
        namespace: String,
        /// Gateway name
        gateway: String,
        /// Parser error text
        reason: String,
    },
}

#[cfg(test)]
#[path = "policy_errors_tests.rs"]
mod policy_errors_tests;
