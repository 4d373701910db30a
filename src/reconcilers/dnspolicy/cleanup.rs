// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Teardown of everything a `DNSPolicy` produced.
//!
//! Teardown never needs the target Gateway: records and probes are selected by
//! the policy labels, and back-references are found by scanning the Gateways in
//! the policy's namespace. It runs when the target disappears and before the
//! finalizer is released on deletion.

use super::backrefs::unbind_other_gateways;
use super::records::policy_selector;
use crate::constants::KIND_DNS_POLICY;
use crate::crd::{DNSHealthCheckProbe, DNSPolicy, DNSRecord};
use crate::metrics;
use crate::reconcilers::finalizers::FinalizerCleanup;
use crate::reconcilers::resources::delete_labeled;
use anyhow::{Context as _, Result};
use kube::{Client, ResourceExt};
use tracing::info;

/// Counts of what a teardown removed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TeardownSummary {
    pub gateways_unbound: usize,
    pub records_deleted: usize,
    pub probes_deleted: usize,
}

/// Remove back-references, records and probes of `policy`.
///
/// # Errors
///
/// Returns an error if any step fails. Steps already completed stay done and
/// the next attempt only repeats what is left.
pub async fn teardown(client: &Client, policy: &DNSPolicy) -> Result<TeardownSummary> {
    let namespace = policy.namespace().unwrap_or_default();
    let name = policy.name_any();
    let selector = policy_selector(policy);

    let gateways_unbound = unbind_other_gateways(client, policy, None)
        .await
        .with_context(|| format!("remove back-references of DNSPolicy {namespace}/{name}"))?;
    let records_deleted = delete_labeled::<DNSRecord>(client, &namespace, &selector)
        .await
        .with_context(|| format!("delete DNSRecords of DNSPolicy {namespace}/{name}"))?;
    let probes_deleted = delete_labeled::<DNSHealthCheckProbe>(client, &namespace, &selector)
        .await
        .with_context(|| format!("delete probes of DNSPolicy {namespace}/{name}"))?;

    let summary = TeardownSummary {
        gateways_unbound,
        records_deleted,
        probes_deleted,
    };
    if summary != TeardownSummary::default() {
        info!(
            "Tore down DNSPolicy {}/{}: {} gateway(s) unbound, {} record(s) and {} probe(s) deleted",
            namespace, name, gateways_unbound, records_deleted, probes_deleted
        );
    }
    Ok(summary)
}

#[async_trait::async_trait]
impl FinalizerCleanup for DNSPolicy {
    async fn cleanup(&self, client: &Client) -> Result<()> {
        let result = teardown(client, self).await;
        metrics::record_finalizer_cleanup(KIND_DNS_POLICY, result.is_ok());
        result.map(|_| ())
    }
}
