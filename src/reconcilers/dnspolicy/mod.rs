// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `DNSPolicy` reconciliation logic.
//!
//! Each pass recomputes the complete desired state from the current policy,
//! Gateway and `ManagedZone`s and converges the cluster onto it. Nothing is
//! remembered between passes.
//!
//! ## Module Structure
//!
//! - [`target`] - Target lookup and classification
//! - [`validation`] - Gateway status validation and cluster partitioning
//! - [`zones`] - `ManagedZone` selection for listener hosts
//! - [`endpoints`] - Simple and load-balanced endpoint synthesis
//! - [`records`] - Desired `DNSRecord` objects
//! - [`probes`] - Desired `DNSHealthCheckProbe` objects
//! - [`backrefs`] - Gateway back-reference annotations and affected condition
//! - [`cleanup`] - Target-independent teardown and the finalizer hook
//! - [`status_helpers`] - Ready condition and requeue interval
//! - [`types`] - Shared types

pub mod backrefs;
pub mod cleanup;
pub mod endpoints;
pub mod probes;
pub mod records;
pub mod status_helpers;
pub mod target;
pub mod types;
pub mod validation;
pub mod zones;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::constants::KIND_DNS_POLICY;
use crate::context::Context;
use crate::crd::{DNSHealthCheckProbe, DNSPolicy, Gateway};
use crate::labels::FINALIZER_DNS_POLICY;
use crate::policy_errors::BackReferenceError;
use crate::reconcilers::finalizers::{ensure_finalizer, handle_deletion, remove_finalizer};
use crate::reconcilers::resources::{sync_derived, SyncOutcome};
use crate::reconcilers::status::DNSPolicyStatusUpdater;
use anyhow::Result;
use kube::runtime::controller::Action;
use kube::ResourceExt;
use status_helpers::PassOutcome;
use std::sync::Arc;
use tracing::{debug, info, warn};
use types::{PolicyReference, TargetResolution};

/// Reconciles a `DNSPolicy` resource.
///
/// 1. Deleting policies are torn down and their finalizer released
/// 2. The target is resolved; a missing or unsupported target tears down all
///    derived state and releases the finalizer
/// 3. The finalizer is added and the policy bound to the Gateway, unbinding it
///    from any Gateway it targeted before. A corrupted back-reference annotation
///    on the Gateway stops the pass and is reported on the Ready condition
/// 4. The Gateway status is validated; on failure probes are removed and the
///    error is reported without synthesizing records
/// 5. Records and probes are converged onto the desired set
/// 6. The Ready condition is written if it changed
///
/// # Arguments
///
/// * `ctx` - Controller context with Kubernetes client and configuration
/// * `policy` - The `DNSPolicy` resource to reconcile
///
/// # Returns
///
/// When to look at the policy again.
///
/// # Errors
///
/// Returns an error if Kubernetes API operations fail.
pub async fn reconcile_dnspolicy(ctx: Arc<Context>, policy: DNSPolicy) -> Result<Action> {
    let client = ctx.client.clone();
    let namespace = policy.namespace().unwrap_or_default();
    let name = policy.name_any();

    info!("Reconciling {}: {}/{}", KIND_DNS_POLICY, namespace, name);
    debug!(
        namespace = %namespace,
        name = %name,
        generation = ?policy.metadata.generation,
        "Starting DNSPolicy reconciliation"
    );

    if policy.metadata.deletion_timestamp.is_some() {
        handle_deletion(&client, &policy, FINALIZER_DNS_POLICY).await?;
        return Ok(Action::await_change());
    }

    let outcome = match target::resolve_target(&client, &policy).await? {
        TargetResolution::Found(gateway) => reconcile_bound(&ctx, &policy, &gateway).await?,
        unusable => {
            let message = unusable.failure_message().unwrap_or_default().to_string();
            info!("DNSPolicy {}/{}: {}", namespace, name, message);
            cleanup::teardown(&client, &policy).await?;
            remove_finalizer(&client, &policy, FINALIZER_DNS_POLICY).await?;
            PassOutcome::TargetNotFound { message }
        }
    };

    let mut updater = DNSPolicyStatusUpdater::new(&policy);
    outcome.apply_to(&mut updater);
    updater.apply(&client).await?;

    Ok(Action::requeue(outcome.requeue_after(&ctx.config)))
}

/// Reconcile a policy whose target Gateway exists.
async fn reconcile_bound(ctx: &Context, policy: &DNSPolicy, gateway: &Gateway) -> Result<PassOutcome> {
    let client = &ctx.client;
    let namespace = policy.namespace().unwrap_or_default();
    let gateway_name = gateway.name_any();
    let reference = PolicyReference::of(policy);

    ensure_finalizer(client, policy, FINALIZER_DNS_POLICY).await?;

    backrefs::unbind_other_gateways(client, policy, Some(&gateway_name)).await?;
    if let Err(e) = backrefs::bind_gateway(client, &namespace, &gateway_name, &reference).await {
        let corrupted = e
            .chain()
            .find_map(|cause| cause.downcast_ref::<BackReferenceError>())
            .cloned();
        let Some(corrupted) = corrupted else {
            return Err(e);
        };
        warn!(
            "DNSPolicy {} cannot bind Gateway {}/{}: {}",
            reference, namespace, gateway_name, corrupted
        );
        return Ok(PassOutcome::CorruptedBackReferences(corrupted));
    }

    let selector = records::policy_selector(policy);

    let status = match validation::validate_gateway_status(gateway.status.as_ref()) {
        Ok(status) => status,
        Err(e) => {
            warn!(
                "Gateway {}/{} targeted by DNSPolicy {} is invalid: {}",
                namespace, gateway_name, reference, e
            );
            sync_derived::<DNSHealthCheckProbe>(client, &namespace, &selector, vec![]).await?;
            return Ok(PassOutcome::InvalidGateway(e));
        }
    };

    let targets = if status.is_empty() {
        debug!(
            gateway = %gateway_name,
            namespace = %namespace,
            "Gateway reports nothing to publish yet"
        );
        vec![]
    } else {
        let zones = zones::list_zones(client, &namespace).await?;
        zones::select_listeners(gateway, &zones, &status)
    };
    let settings = endpoints::EndpointSettings::resolve(policy, &ctx.config);

    let desired = records::desired_records(policy, gateway, &targets, &status, &settings);
    let record_count = desired.len();
    let record_sync = sync_derived(client, &namespace, &selector, desired).await?;

    let probes = probes::desired_probes(policy, gateway, &targets, &status);
    let probe_sync = sync_derived(client, &namespace, &selector, probes).await?;

    log_sync(&reference, "DNSRecord", record_sync);
    log_sync(&reference, "DNSHealthCheckProbe", probe_sync);

    Ok(PassOutcome::Enabled {
        gateway: format!("{namespace}/{gateway_name}"),
        records: record_count - record_sync.skipped,
    })
}

fn log_sync(policy: &PolicyReference, kind: &str, outcome: SyncOutcome) {
    if outcome.writes() == 0 {
        debug!(policy = %policy, kind = kind, "Derived objects up to date");
    } else {
        info!(
            "DNSPolicy {}: {} {} created, {} updated, {} deleted",
            policy, kind, outcome.created, outcome.updated, outcome.deleted
        );
    }
}
