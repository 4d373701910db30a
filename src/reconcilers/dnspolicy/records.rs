// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired `DNSRecord` objects for a bound Gateway.
//!
//! One record per published listener, named `<gateway>-<listener>`. Records are
//! labelled with the producing policy and Gateway so teardown can select them
//! without the Gateway, and carry a controller owner reference to the policy.

use super::endpoints::{build_endpoints, EndpointSettings};
use super::types::{ListenerTarget, ValidatedStatus};
use crate::constants::{GATEWAY_API_GROUP, KIND_GATEWAY};
use crate::crd::{DNSPolicy, DNSRecord, DNSRecordSpec, Gateway, ManagedZoneReference, PolicyTargetReference};
use crate::labels::{
    K8S_MANAGED_BY, K8S_PART_OF, LABEL_GATEWAY_NAME, LABEL_GATEWAY_NAMESPACE, LABEL_LISTENER_NAME,
    LABEL_POLICY_NAME, LABEL_POLICY_NAMESPACE, MANAGED_BY_DNS_POLICY, PART_OF_GATEWAYDNS,
};
use crate::reconcilers::resources::DerivedResource;
use kube::api::ObjectMeta;
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;

/// Deterministic record name for a (Gateway, listener) pair.
#[must_use]
pub fn record_name(gateway: &str, listener: &str) -> String {
    format!("{gateway}-{listener}").to_ascii_lowercase()
}

/// Labels identifying objects derived from `policy` for the given Gateway.
#[must_use]
pub fn derived_labels(
    policy: &DNSPolicy,
    gateway_name: &str,
    gateway_namespace: &str,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        (K8S_MANAGED_BY.to_string(), MANAGED_BY_DNS_POLICY.to_string()),
        (K8S_PART_OF.to_string(), PART_OF_GATEWAYDNS.to_string()),
        (LABEL_POLICY_NAME.to_string(), policy.name_any()),
        (
            LABEL_POLICY_NAMESPACE.to_string(),
            policy.namespace().unwrap_or_default(),
        ),
        (LABEL_GATEWAY_NAME.to_string(), gateway_name.to_string()),
        (
            LABEL_GATEWAY_NAMESPACE.to_string(),
            gateway_namespace.to_string(),
        ),
    ])
}

/// Selector matching every object derived from `policy`, whatever its Gateway.
#[must_use]
pub fn policy_selector(policy: &DNSPolicy) -> String {
    format!(
        "{}={},{}={}",
        LABEL_POLICY_NAME,
        policy.name_any(),
        LABEL_POLICY_NAMESPACE,
        policy.namespace().unwrap_or_default()
    )
}

/// Build the desired `DNSRecord` for one listener.
#[must_use]
pub fn build_record(
    policy: &DNSPolicy,
    gateway: &Gateway,
    target: &ListenerTarget,
    status: &ValidatedStatus,
    settings: &EndpointSettings,
) -> DNSRecord {
    let gateway_name = gateway.name_any();
    let gateway_namespace = gateway.namespace().unwrap_or_default();
    let clusters = status.clusters_serving(&target.listener_name);
    let endpoints = build_endpoints(
        &format!("{gateway_namespace}/{gateway_name}"),
        target,
        &clusters,
        settings,
    );

    let mut labels = derived_labels(policy, &gateway_name, &gateway_namespace);
    labels.insert(LABEL_LISTENER_NAME.to_string(), target.listener_name.clone());

    DNSRecord {
        metadata: ObjectMeta {
            name: Some(record_name(&gateway_name, &target.listener_name)),
            namespace: Some(gateway_namespace),
            labels: Some(labels),
            owner_references: policy.controller_owner_ref(&()).map(|r| vec![r]),
            ..Default::default()
        },
        spec: DNSRecordSpec {
            managed_zone: ManagedZoneReference {
                name: target.zone_name.clone(),
            },
            target_ref: PolicyTargetReference {
                group: GATEWAY_API_GROUP.to_string(),
                kind: KIND_GATEWAY.to_string(),
                name: gateway_name,
            },
            listener_name: target.listener_name.clone(),
            endpoints,
        },
        status: None,
    }
}

/// Desired records for every published listener.
#[must_use]
pub fn desired_records(
    policy: &DNSPolicy,
    gateway: &Gateway,
    targets: &[ListenerTarget],
    status: &ValidatedStatus,
    settings: &EndpointSettings,
) -> Vec<DNSRecord> {
    targets
        .iter()
        .map(|t| build_record(policy, gateway, t, status, settings))
        .collect()
}

/// Whether every desired label is present on `have` with the same value.
pub(crate) fn labels_cover(have: &BTreeMap<String, String>, want: &BTreeMap<String, String>) -> bool {
    want.iter().all(|(k, v)| have.get(k) == Some(v))
}

impl DerivedResource for DNSRecord {
    fn matches(&self, desired: &Self) -> bool {
        self.spec == desired.spec
            && labels_cover(self.labels(), desired.labels())
            && self.owner_references() == desired.owner_references()
    }
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod records_tests;
