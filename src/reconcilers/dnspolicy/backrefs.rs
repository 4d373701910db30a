// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Back-references from a Gateway to the policies bound to it.
//!
//! A Gateway bound by one or more policies carries:
//!
//! - `gatewaydns.io/dnspolicy: <namespace>/<name>` - the primary policy
//! - `gatewaydns.io/dnspolicies: [{"name": ..., "namespace": ...}, ...]` - every
//!   bound policy, in bind order
//! - a `DNSPolicyAffected` status condition, `True`/`Accepted`
//!
//! When the list becomes empty both annotations and the condition are removed.
//! Several policies may update the same Gateway concurrently, so every update is
//! a read-modify-write carrying the observed `resourceVersion`, retried on
//! conflict.

use super::types::PolicyReference;
use crate::constants::KIND_GATEWAY;
use crate::crd::{Condition, DNSPolicy, Gateway};
use crate::labels::{DNS_POLICIES_BACK_REF_ANNOTATION, DNS_POLICY_BACK_REF_ANNOTATION};
use crate::metrics;
use crate::policy_errors::BackReferenceError;
use crate::reconcilers::retry::{retry_api_call, retry_on_conflict};
use crate::reconcilers::status::{create_condition, remove_condition, update_condition_in_memory};
use crate::status_reasons::{
    CONDITION_TYPE_DNS_POLICY_AFFECTED, MESSAGE_POLICY_AFFECTED, REASON_ACCEPTED, STATUS_TRUE,
};
use anyhow::Result;
use kube::api::{ListParams, Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// The back-reference annotations of one Gateway.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackReferences {
    /// Value of the single-policy annotation
    pub primary: Option<String>,
    /// Entries of the list annotation, in insertion order
    pub policies: Vec<PolicyReference>,
}

impl BackReferences {
    /// Read the annotations of `gateway`.
    ///
    /// # Errors
    ///
    /// Returns [`BackReferenceError::Corrupted`] if the list annotation is not a
    /// JSON array of `{name, namespace}`.
    pub fn from_gateway(gateway: &Gateway) -> Result<Self, BackReferenceError> {
        let annotations = gateway.annotations();
        let policies = match annotations.get(DNS_POLICIES_BACK_REF_ANNOTATION) {
            None => vec![],
            Some(raw) if raw.trim().is_empty() => vec![],
            Some(raw) => serde_json::from_str::<Vec<PolicyReference>>(raw).map_err(|e| {
                BackReferenceError::Corrupted {
                    annotation: DNS_POLICIES_BACK_REF_ANNOTATION.to_string(),
                    namespace: gateway.namespace().unwrap_or_default(),
                    gateway: gateway.name_any(),
                    reason: e.to_string(),
                }
            })?,
        };
        Ok(Self {
            primary: annotations.get(DNS_POLICY_BACK_REF_ANNOTATION).cloned(),
            policies,
        })
    }

    /// Whether `policy` is referenced by either annotation.
    #[must_use]
    pub fn references(&self, policy: &PolicyReference) -> bool {
        self.policies.contains(policy) || self.primary.as_deref() == Some(policy.to_string().as_str())
    }

    /// Whether no policy is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Record `policy` as bound. Returns whether anything changed.
    pub fn bind(&mut self, policy: &PolicyReference) -> bool {
        let mut changed = false;
        if !self.policies.contains(policy) {
            self.policies.push(policy.clone());
            changed = true;
        }
        if self.primary.is_none() {
            self.primary = Some(policy.to_string());
            changed = true;
        }
        changed
    }

    /// Remove `policy`. Returns whether anything changed.
    ///
    /// If it was the primary, the first remaining entry is promoted.
    pub fn unbind(&mut self, policy: &PolicyReference) -> bool {
        let before = self.clone();
        self.policies.retain(|p| p != policy);
        if self.primary.as_deref() == Some(policy.to_string().as_str()) || self.policies.is_empty() {
            self.primary = self.policies.first().map(ToString::to_string);
        }
        *self != before
    }

    /// Merge-patch body for the annotations; `null` removes a key.
    #[must_use]
    pub fn annotation_patch(&self) -> Value {
        if self.policies.is_empty() {
            return json!({
                DNS_POLICY_BACK_REF_ANNOTATION: Value::Null,
                DNS_POLICIES_BACK_REF_ANNOTATION: Value::Null,
            });
        }
        json!({
            DNS_POLICY_BACK_REF_ANNOTATION: self.primary,
            DNS_POLICIES_BACK_REF_ANNOTATION: serde_json::to_string(&self.policies).unwrap_or_default(),
        })
    }
}

/// Gateway conditions after a bind or unbind.
///
/// # Returns
///
/// The new condition list and whether it differs from the Gateway's.
#[must_use]
pub fn affected_conditions(gateway: &Gateway, refs: &BackReferences) -> (Vec<Condition>, bool) {
    let mut conditions = gateway
        .status
        .as_ref()
        .map(|s| s.conditions.clone())
        .unwrap_or_default();
    let changed = if refs.is_empty() {
        remove_condition(&mut conditions, CONDITION_TYPE_DNS_POLICY_AFFECTED)
    } else {
        update_condition_in_memory(
            &mut conditions,
            create_condition(
                CONDITION_TYPE_DNS_POLICY_AFFECTED,
                STATUS_TRUE,
                REASON_ACCEPTED,
                MESSAGE_POLICY_AFFECTED,
                gateway.metadata.generation,
            ),
        )
    };
    (conditions, changed)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Binding {
    Bind,
    Unbind,
}

async fn update_gateway(
    client: &Client,
    namespace: &str,
    name: &str,
    policy: &PolicyReference,
    binding: Binding,
) -> Result<bool> {
    let api: Api<Gateway> = Api::namespaced(client.clone(), namespace);
    let api = &api;

    retry_on_conflict(
        || async move {
            let Some(gateway) = api.get_opt(name).await? else {
                debug!(gateway = %name, namespace = %namespace, "Gateway gone, no back-references to update");
                return Ok(false);
            };

            let mut refs = BackReferences::from_gateway(&gateway)?;
            let refs_changed = match binding {
                Binding::Bind => refs.bind(policy),
                Binding::Unbind => refs.unbind(policy),
            };
            let (conditions, conditions_changed) = affected_conditions(&gateway, &refs);

            if !refs_changed && !conditions_changed {
                return Ok(false);
            }

            let mut resource_version = gateway.resource_version();
            if refs_changed {
                let patch = json!({
                    "metadata": {
                        "resourceVersion": resource_version,
                        "annotations": refs.annotation_patch(),
                    }
                });
                let updated = api
                    .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
                    .await?;
                resource_version = updated.resource_version();
            }
            if conditions_changed {
                let patch = json!({
                    "metadata": { "resourceVersion": resource_version },
                    "status": { "conditions": conditions },
                });
                api.patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
                    .await?;
            }

            metrics::record_resource_updated(KIND_GATEWAY);
            info!(
                "{} back-reference {} on Gateway {}/{}",
                if binding == Binding::Bind { "Bound" } else { "Removed" },
                policy,
                namespace,
                name
            );
            Ok(true)
        },
        &format!("update back-references on gateway {namespace}/{name}"),
    )
    .await
}

/// Bind `policy` to the Gateway `namespace/name`.
///
/// # Returns
///
/// Whether the Gateway was written.
///
/// # Errors
///
/// Returns an error on API failure, persistent conflicts, or a corrupted list
/// annotation.
pub async fn bind_gateway(
    client: &Client,
    namespace: &str,
    name: &str,
    policy: &PolicyReference,
) -> Result<bool> {
    update_gateway(client, namespace, name, policy, Binding::Bind).await
}

/// Remove `policy` from the Gateway `namespace/name`. A missing Gateway is not an error.
///
/// # Errors
///
/// Same as [`bind_gateway`].
pub async fn unbind_gateway(
    client: &Client,
    namespace: &str,
    name: &str,
    policy: &PolicyReference,
) -> Result<bool> {
    update_gateway(client, namespace, name, policy, Binding::Unbind).await
}

/// Remove `policy` from every Gateway in its namespace except `keep`.
///
/// Used when a policy is retargeted, unbound from a missing target, or deleted.
/// Gateways with corrupted annotations are skipped with a warning.
///
/// # Returns
///
/// Number of Gateways updated.
///
/// # Errors
///
/// Returns an error if listing Gateways or any update fails.
pub async fn unbind_other_gateways(
    client: &Client,
    policy: &DNSPolicy,
    keep: Option<&str>,
) -> Result<usize> {
    let namespace = policy.namespace().unwrap_or_default();
    let reference = PolicyReference::of(policy);
    let api: Api<Gateway> = Api::namespaced(client.clone(), &namespace);
    let lp = ListParams::default();
    let gateways = retry_api_call(
        || api.list(&lp),
        &format!("list gateways in {namespace}"),
    )
    .await?;

    let mut updated = 0;
    for gateway in gateways.items {
        let name = gateway.name_any();
        if keep == Some(name.as_str()) {
            continue;
        }
        match BackReferences::from_gateway(&gateway) {
            Ok(refs) if refs.references(&reference) => {
                if unbind_gateway(client, &namespace, &name, &reference).await? {
                    updated += 1;
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping back-reference cleanup: {}", e),
        }
    }
    Ok(updated)
}

#[cfg(test)]
#[path = "backrefs_tests.rs"]
mod backrefs_tests;
