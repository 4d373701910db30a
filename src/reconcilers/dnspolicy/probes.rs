// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired `DNSHealthCheckProbe` objects.
//!
//! One probe per (address, host) pair published for the policy. Without a
//! `spec.healthCheck` the desired set is empty, so existing probes are removed.

use super::records::{derived_labels, labels_cover};
use super::types::{ListenerTarget, ValidatedStatus};
use crate::constants::{
    DEFAULT_HEALTH_CHECK_FAILURE_THRESHOLD, DEFAULT_HEALTH_CHECK_INTERVAL_SECS,
    DEFAULT_HEALTH_CHECK_PATH, DEFAULT_HEALTH_CHECK_PORT, DEFAULT_HEALTH_CHECK_PROTOCOL,
    MAX_OBJECT_NAME_LEN,
};
use crate::crd::{DNSHealthCheckProbe, DNSHealthCheckProbeSpec, DNSPolicy, Gateway, HealthCheckSpec};
use crate::reconcilers::resources::DerivedResource;
use kube::api::ObjectMeta;
use kube::{Resource, ResourceExt};
use std::collections::BTreeSet;

/// Probe name `<address>-<gateway>-<host>` reduced to a DNS-1123 subdomain.
#[must_use]
pub fn probe_name(address: &str, gateway: &str, host: &str) -> String {
    let raw = format!("{address}-{gateway}-{host}").to_ascii_lowercase();
    let mut name: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect();
    name.truncate(MAX_OBJECT_NAME_LEN);
    name.trim_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_string()
}

fn probe_spec(address: &str, host: &str, hc: &HealthCheckSpec) -> DNSHealthCheckProbeSpec {
    DNSHealthCheckProbeSpec {
        address: address.to_string(),
        host: host.to_string(),
        port: hc.port.unwrap_or(DEFAULT_HEALTH_CHECK_PORT),
        path: hc
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_HEALTH_CHECK_PATH.to_string()),
        protocol: hc
            .protocol
            .clone()
            .unwrap_or_else(|| DEFAULT_HEALTH_CHECK_PROTOCOL.to_string()),
        interval_seconds: hc
            .interval_seconds
            .unwrap_or(DEFAULT_HEALTH_CHECK_INTERVAL_SECS),
        failure_threshold: hc
            .failure_threshold
            .unwrap_or(DEFAULT_HEALTH_CHECK_FAILURE_THRESHOLD),
        allow_insecure_certificate: hc.allow_insecure_certificates.unwrap_or(false),
    }
}

/// Desired probes for the published listeners of `gateway`.
///
/// Wildcard hosts are not probed.
#[must_use]
pub fn desired_probes(
    policy: &DNSPolicy,
    gateway: &Gateway,
    targets: &[ListenerTarget],
    status: &ValidatedStatus,
) -> Vec<DNSHealthCheckProbe> {
    let Some(hc) = policy.spec.health_check.as_ref() else {
        return vec![];
    };
    let gateway_name = gateway.name_any();
    let gateway_namespace = gateway.namespace().unwrap_or_default();
    let labels = derived_labels(policy, &gateway_name, &gateway_namespace);

    let mut pairs = BTreeSet::new();
    for target in targets.iter().filter(|t| !t.is_wildcard()) {
        for cluster in status.clusters_serving(&target.listener_name) {
            for address in &cluster.addresses {
                pairs.insert((address.to_string(), target.host.clone()));
            }
        }
    }

    pairs
        .into_iter()
        .map(|(address, host)| DNSHealthCheckProbe {
            metadata: ObjectMeta {
                name: Some(probe_name(&address, &gateway_name, &host)),
                namespace: Some(gateway_namespace.clone()),
                labels: Some(labels.clone()),
                owner_references: policy.controller_owner_ref(&()).map(|r| vec![r]),
                ..Default::default()
            },
            spec: probe_spec(&address, &host, hc),
            status: None,
        })
        .collect()
}

impl DerivedResource for DNSHealthCheckProbe {
    fn matches(&self, desired: &Self) -> bool {
        self.spec == desired.spec
            && labels_cover(self.labels(), desired.labels())
            && self.owner_references() == desired.owner_references()
    }
}

#[cfg(test)]
#[path = "probes_tests.rs"]
mod probes_tests;
