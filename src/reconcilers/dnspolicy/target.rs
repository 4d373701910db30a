// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Target resolution for `DNSPolicy`.
//!
//! A policy's target is always looked up in the policy's own namespace. Only a
//! Gateway API `Gateway` can carry DNS; anything else is classified as unsupported
//! without an API call.

use super::types::TargetResolution;
use crate::constants::{GATEWAY_API_GROUP, KIND_GATEWAY};
use crate::crd::{DNSPolicy, Gateway, PolicyTargetReference};
use crate::reconcilers::retry::retry_api_call;
use anyhow::Result;
use kube::{Api, Client, ResourceExt};
use tracing::debug;

/// Whether a target reference names a DNS-capable kind.
#[must_use]
pub fn is_dns_capable(target_ref: &PolicyTargetReference) -> bool {
    target_ref.group == GATEWAY_API_GROUP && target_ref.kind == KIND_GATEWAY
}

/// Classify a looked-up target.
///
/// # Arguments
///
/// * `namespace` - Namespace the lookup was made in
/// * `target_ref` - The policy's target reference
/// * `gateway` - The Gateway found under that name, if any
#[must_use]
pub fn classify_target(
    namespace: &str,
    target_ref: &PolicyTargetReference,
    gateway: Option<Gateway>,
) -> TargetResolution {
    if !is_dns_capable(target_ref) {
        return TargetResolution::Unsupported {
            message: format!(
                "target {}/{} {}/{} is not a DNS-capable kind",
                target_ref.group, target_ref.kind, namespace, target_ref.name
            ),
        };
    }

    match gateway {
        None => TargetResolution::NotFound {
            message: format!("Gateway {}/{} not found", namespace, target_ref.name),
        },
        Some(gw) if gw.metadata.deletion_timestamp.is_some() => TargetResolution::NotFound {
            message: format!("Gateway {}/{} is being deleted", namespace, target_ref.name),
        },
        Some(gw) => TargetResolution::Found(Box::new(gw)),
    }
}

/// Resolve the policy's target.
///
/// # Errors
///
/// Returns an error only for API failures; an absent target is a classification,
/// not an error.
pub async fn resolve_target(client: &Client, policy: &DNSPolicy) -> Result<TargetResolution> {
    let namespace = policy.namespace().unwrap_or_default();
    let target_ref = &policy.spec.target_ref;

    if !is_dns_capable(target_ref) {
        return Ok(classify_target(&namespace, target_ref, None));
    }

    let api: Api<Gateway> = Api::namespaced(client.clone(), &namespace);
    let gateway = retry_api_call(
        || api.get_opt(&target_ref.name),
        &format!("get gateway {}/{}", namespace, target_ref.name),
    )
    .await?;

    debug!(
        namespace = %namespace,
        gateway = %target_ref.name,
        found = gateway.is_some(),
        "Resolved DNSPolicy target"
    );

    Ok(classify_target(&namespace, target_ref, gateway))
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod target_tests;
