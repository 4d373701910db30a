// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Ready condition for a `DNSPolicy` reconciliation pass.

use crate::config::Config;
use crate::policy_errors::{BackReferenceError, GatewayValidationError};
use crate::reconcilers::status::DNSPolicyStatusUpdater;
use crate::status_reasons::{
    REASON_GATEWAY_DNS_ENABLED, REASON_RECONCILIATION_ERROR, REASON_TARGET_NOT_FOUND,
};
use std::time::Duration;

/// What a pass concluded about the policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// Target missing, being deleted, or not DNS-capable
    TargetNotFound { message: String },
    /// Target found but its status failed validation
    InvalidGateway(GatewayValidationError),
    /// Target found but its back-reference annotations cannot be updated
    CorruptedBackReferences(BackReferenceError),
    /// Bound; `records` listeners published (zero while the Gateway has no status)
    Enabled { gateway: String, records: usize },
}

impl PassOutcome {
    /// Whether the Ready condition is `True`.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    /// Reason for the Ready condition.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TargetNotFound { .. } => REASON_TARGET_NOT_FOUND,
            Self::InvalidGateway(_) | Self::CorruptedBackReferences(_) => {
                REASON_RECONCILIATION_ERROR
            }
            Self::Enabled { .. } => REASON_GATEWAY_DNS_ENABLED,
        }
    }

    /// Message for the Ready condition.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::TargetNotFound { message } => message.clone(),
            Self::InvalidGateway(e) => e.to_string(),
            Self::CorruptedBackReferences(e) => e.to_string(),
            Self::Enabled { gateway, records: 0 } => {
                format!("DNS enabled for Gateway {gateway}; no listeners to publish yet")
            }
            Self::Enabled { gateway, records } => {
                format!("DNS enabled for Gateway {gateway}; {records} listener(s) published")
            }
        }
    }

    /// Write this outcome into a status updater.
    pub fn apply_to(&self, updater: &mut DNSPolicyStatusUpdater) {
        updater.set_ready(self.is_ready(), self.reason(), &self.message());
    }

    /// Delay before the policy is reconciled again.
    #[must_use]
    pub fn requeue_after(&self, config: &Config) -> Duration {
        if self.is_ready() {
            Duration::from_secs(config.requeue_ready_secs)
        } else {
            Duration::from_secs(config.requeue_not_ready_secs)
        }
    }
}

#[cfg(test)]
#[path = "status_helpers_tests.rs"]
mod status_helpers_tests;
