// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `ManagedZone` lookup and listener selection.

use super::types::{ListenerTarget, ValidatedStatus};
use crate::crd::{Gateway, ManagedZone};
use crate::reconcilers::retry::retry_api_call;
use anyhow::Result;
use kube::api::ListParams;
use kube::{Api, Client, ResourceExt};
use tracing::debug;

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// Whether `host` lies inside `domain`. A wildcard host is matched on its suffix.
#[must_use]
pub fn host_in_zone(host: &str, domain: &str) -> bool {
    let host = normalize(host.strip_prefix("*.").unwrap_or(host));
    let domain = normalize(domain);
    if domain.is_empty() {
        return false;
    }
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// The most specific zone containing `host`.
///
/// Ties on domain length are broken by zone name so the choice is stable.
#[must_use]
pub fn find_zone<'a>(host: &str, zones: &'a [ManagedZone]) -> Option<&'a ManagedZone> {
    zones
        .iter()
        .filter(|z| host_in_zone(host, &z.spec.domain_name))
        .max_by(|a, b| {
            normalize(&a.spec.domain_name)
                .len()
                .cmp(&normalize(&b.spec.domain_name).len())
                .then_with(|| b.name_any().cmp(&a.name_any()))
        })
}

/// Listeners of `gateway` that get a `DNSRecord`.
///
/// A listener is published when it declares a hostname, the hostname falls in a
/// managed zone, and at least one cluster serves it.
#[must_use]
pub fn select_listeners(
    gateway: &Gateway,
    zones: &[ManagedZone],
    status: &ValidatedStatus,
) -> Vec<ListenerTarget> {
    let mut selected = Vec::new();
    for listener in &gateway.spec.listeners {
        let Some(host) = listener.hostname.as_deref().filter(|h| !h.is_empty()) else {
            debug!(listener = %listener.name, "Listener has no hostname, skipping");
            continue;
        };
        let Some(zone) = find_zone(host, zones) else {
            debug!(listener = %listener.name, host = %host, "Host is not in a managed zone, skipping");
            continue;
        };
        if status.clusters_serving(&listener.name).is_empty() {
            debug!(listener = %listener.name, "No cluster serves listener yet, skipping");
            continue;
        }
        selected.push(ListenerTarget {
            listener_name: listener.name.clone(),
            host: normalize(host),
            zone_name: zone.name_any(),
        });
    }
    selected
}

/// List the managed zones in `namespace`.
///
/// # Errors
///
/// Returns an error if the list call fails after retries.
pub async fn list_zones(client: &Client, namespace: &str) -> Result<Vec<ManagedZone>> {
    let api: Api<ManagedZone> = Api::namespaced(client.clone(), namespace);
    let lp = ListParams::default();
    let list = retry_api_call(
        || api.list(&lp),
        &format!("list managed zones in {namespace}"),
    )
    .await?;
    Ok(list.items)
}

#[cfg(test)]
#[path = "zones_tests.rs"]
mod zones_tests;
