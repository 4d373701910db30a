// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Status condition helpers for Kubernetes resources.
//!
//! # Condition Format
//!
//! Conditions follow the `metav1.Condition` conventions:
//! - `type`: The aspect of the resource being reported (e.g., "Ready")
//! - `status`: "True", "False", or "Unknown"
//! - `reason`: A programmatic identifier (CamelCase)
//! - `message`: A human-readable explanation
//! - `lastTransitionTime`: RFC3339 timestamp when the status last changed
//! - `observedGeneration`: Generation of the object the condition was computed for
//!
//! # Example
//!
//! ```rust,no_run
//! use gatewaydns::reconcilers::status::create_condition;
//!
//! let condition = create_condition(
//!     "Ready",
//!     "True",
//!     "GatewayDNSEnabled",
//!     "DNS enabled for Gateway",
//!     Some(2),
//! );
//! ```

use crate::crd::{Condition, DNSPolicy, DNSPolicyStatus};
use anyhow::Result;
use chrono::Utc;
use kube::api::Patch;
use kube::{api::PatchParams, Api, Client, ResourceExt};
use serde_json::json;
use tracing::debug;

/// Create a new condition with the current timestamp.
///
/// # Arguments
///
/// * `condition_type` - The type of condition (e.g., "Ready")
/// * `status` - The status: "True", "False", or "Unknown"
/// * `reason` - A programmatic identifier in `CamelCase`
/// * `message` - A human-readable explanation
/// * `observed_generation` - Generation the condition describes
///
/// # Example
///
/// ```rust,no_run
/// # use gatewaydns::reconcilers::status::create_condition;
/// let condition = create_condition("Ready", "False", "TargetNotFound", "Gateway not found", None);
/// assert_eq!(condition.r#type, "Ready");
/// assert_eq!(condition.status, "False");
/// ```
#[must_use]
pub fn create_condition(
    condition_type: &str,
    status: &str,
    reason: &str,
    message: &str,
    observed_generation: Option<i64>,
) -> Condition {
    Condition {
        r#type: condition_type.to_string(),
        status: status.to_string(),
        reason: Some(reason.to_string()),
        message: Some(message.to_string()),
        last_transition_time: Some(Utc::now().to_rfc3339()),
        observed_generation,
    }
}

/// Find a condition by type in a list of conditions.
#[must_use]
pub fn find_condition<'a>(
    conditions: &'a [Condition],
    condition_type: &str,
) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.r#type == condition_type)
}

/// Update or add a condition in a mutable conditions list (in-memory, no API call).
///
/// Preserves `lastTransitionTime` when the status value is unchanged, and sets a
/// new timestamp when it flips.
///
/// # Returns
///
/// `true` if the list changed semantically (anything but the timestamp).
pub fn update_condition_in_memory(conditions: &mut Vec<Condition>, new_condition: Condition) -> bool {
    if let Some(existing) = conditions
        .iter_mut()
        .find(|c| c.r#type == new_condition.r#type)
    {
        if condition_equal(existing, &new_condition) {
            return false;
        }

        let last_transition_time = if existing.status == new_condition.status {
            existing
                .last_transition_time
                .clone()
                .or(new_condition.last_transition_time)
        } else {
            new_condition.last_transition_time
        };

        existing.status = new_condition.status;
        existing.reason = new_condition.reason;
        existing.message = new_condition.message;
        existing.observed_generation = new_condition.observed_generation;
        existing.last_transition_time = last_transition_time;
    } else {
        conditions.push(new_condition);
    }
    true
}

/// Remove every condition of the given type.
///
/// # Returns
///
/// `true` if anything was removed.
pub fn remove_condition(conditions: &mut Vec<Condition>, condition_type: &str) -> bool {
    let before = conditions.len();
    conditions.retain(|c| c.r#type != condition_type);
    conditions.len() != before
}

fn condition_equal(a: &Condition, b: &Condition) -> bool {
    a.r#type == b.r#type
        && a.status == b.status
        && a.reason == b.reason
        && a.message == b.message
        && a.observed_generation == b.observed_generation
}

/// Compare two condition lists, ignoring `lastTransitionTime` and ordering.
#[must_use]
pub fn conditions_equal(current: &[Condition], new: &[Condition]) -> bool {
    current.len() == new.len()
        && new.iter().all(|new_cond| {
            current
                .iter()
                .find(|c| c.r#type == new_cond.r#type)
                .is_some_and(|curr| condition_equal(curr, new_cond))
        })
}

/// Centralized status updater for `DNSPolicy` resources.
///
/// Collects status changes during reconciliation and applies them in a single
/// API call, and only when the result differs from what is already stored, so a
/// converged reconciliation does not generate a watch event on its own object.
///
/// # Example
///
/// ```rust,ignore
/// let mut updater = DNSPolicyStatusUpdater::new(&policy);
/// updater.set_ready(false, REASON_TARGET_NOT_FOUND, "Gateway not found");
/// updater.apply(&client).await?;
/// ```
pub struct DNSPolicyStatusUpdater {
    namespace: String,
    name: String,
    generation: Option<i64>,
    current_status: Option<DNSPolicyStatus>,
    new_status: DNSPolicyStatus,
}

impl DNSPolicyStatusUpdater {
    /// Create a new status updater, starting from the policy's current status.
    #[must_use]
    pub fn new(policy: &DNSPolicy) -> Self {
        let current_status = policy.status.clone();
        let new_status = current_status.clone().unwrap_or_default();

        Self {
            namespace: policy.namespace().unwrap_or_default(),
            name: policy.name_any(),
            generation: policy.metadata.generation,
            current_status,
            new_status,
        }
    }

    /// Set the `Ready` condition and the observed generation (in-memory only).
    pub fn set_ready(&mut self, ready: bool, reason: &str, message: &str) {
        let status = if ready {
            crate::status_reasons::STATUS_TRUE
        } else {
            crate::status_reasons::STATUS_FALSE
        };
        update_condition_in_memory(
            &mut self.new_status.conditions,
            create_condition(
                crate::status_reasons::CONDITION_TYPE_READY,
                status,
                reason,
                message,
                self.generation,
            ),
        );
        self.new_status.observed_generation = self.generation;
    }

    /// The conditions as they will be written.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.new_status.conditions
    }

    /// Whether applying would change the stored status.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        match &self.current_status {
            None => self.new_status != DNSPolicyStatus::default(),
            Some(current) => {
                current.observed_generation != self.new_status.observed_generation
                    || !conditions_equal(&current.conditions, &self.new_status.conditions)
            }
        }
    }

    /// Apply the collected status changes (single API call, skipped when unchanged).
    ///
    /// # Returns
    ///
    /// `true` if a write was made.
    ///
    /// # Errors
    ///
    /// Returns an error if the Kubernetes API call fails.
    pub async fn apply(&self, client: &Client) -> Result<bool> {
        if !self.has_changes() {
            debug!(
                "DNSPolicy {}/{} status unchanged, skipping update",
                self.namespace, self.name
            );
            return Ok(false);
        }

        let api: Api<DNSPolicy> = Api::namespaced(client.clone(), &self.namespace);
        let patch = json!({ "status": self.new_status });
        api.patch_status(&self.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;

        debug!(
            "Updated DNSPolicy {}/{} status: {} condition(s)",
            self.namespace,
            self.name,
            self.new_status.conditions.len()
        );
        Ok(true)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
