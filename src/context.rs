// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for the `DNSPolicy` controller.
//!
//! The reconciler receives an `Arc<Context>` that contains:
//! - Kubernetes client
//! - Reflector store of `DNSPolicy` objects
//! - Controller configuration
//!
//! The store lets watch mappers find the policies affected by a Gateway or
//! `ManagedZone` change without an API round-trip.

use crate::config::Config;
use crate::crd::{DNSPolicy, Gateway};
use crate::labels::{DNS_POLICIES_BACK_REF_ANNOTATION, DNS_POLICY_BACK_REF_ANNOTATION};
use crate::reconcilers::dnspolicy::types::PolicyReference;
use kube::runtime::reflector::{ObjectRef, Store};
use kube::{Client, ResourceExt};
use std::collections::BTreeSet;

/// Shared context passed to the controller.
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client for API operations
    pub client: Client,

    /// Reflector stores for watch mappers
    pub stores: Stores,

    /// Controller configuration
    pub config: Config,
}

/// Reflector stores populated by the controller's own watches.
#[derive(Clone)]
pub struct Stores {
    pub dns_policies: Store<DNSPolicy>,
}

impl Stores {
    /// Policies whose `targetRef` names the given Gateway.
    ///
    /// # Arguments
    /// * `namespace` - Namespace of the Gateway
    /// * `name` - Name of the Gateway
    ///
    /// # Returns
    /// Object references of every matching policy in the Gateway's namespace
    #[must_use]
    pub fn policies_targeting(&self, namespace: &str, name: &str) -> Vec<ObjectRef<DNSPolicy>> {
        self.dns_policies
            .state()
            .iter()
            .filter(|policy| {
                policy.namespace().as_deref() == Some(namespace)
                    && policy.spec.target_ref.name == name
            })
            .map(|policy| ObjectRef::from_obj(policy.as_ref()))
            .collect()
    }

    /// Every policy in a namespace.
    #[must_use]
    pub fn policies_in_namespace(&self, namespace: &str) -> Vec<ObjectRef<DNSPolicy>> {
        self.dns_policies
            .state()
            .iter()
            .filter(|policy| policy.namespace().as_deref() == Some(namespace))
            .map(|policy| ObjectRef::from_obj(policy.as_ref()))
            .collect()
    }
}

/// Map a Gateway event to the policies that must be reconciled.
///
/// A policy is affected when it currently targets the Gateway, or when the
/// Gateway's back-reference annotations still name it (a retargeted policy
/// must unbind). Corrupted annotations contribute nothing.
///
/// # Arguments
/// * `stores` - Reflector stores
/// * `gateway` - The changed Gateway
///
/// # Returns
/// Deduplicated policy references
#[must_use]
pub fn policies_for_gateway(stores: &Stores, gateway: &Gateway) -> Vec<ObjectRef<DNSPolicy>> {
    let Some(namespace) = gateway.namespace() else {
        return vec![];
    };
    let name = gateway.name_any();

    let mut refs: BTreeSet<(String, String)> = stores
        .policies_targeting(&namespace, &name)
        .into_iter()
        .filter_map(|r| r.namespace.clone().map(|ns| (ns, r.name.clone())))
        .collect();

    let annotations = gateway.annotations();
    if let Some(single) = annotations.get(DNS_POLICY_BACK_REF_ANNOTATION) {
        if let Some((ns, n)) = single.split_once('/') {
            refs.insert((ns.to_string(), n.to_string()));
        }
    }
    if let Some(list) = annotations.get(DNS_POLICIES_BACK_REF_ANNOTATION) {
        if let Ok(parsed) = serde_json::from_str::<Vec<PolicyReference>>(list) {
            refs.extend(parsed.into_iter().map(|p| (p.namespace, p.name)));
        }
    }

    refs.into_iter()
        .map(|(ns, n)| ObjectRef::new(&n).within(&ns))
        .collect()
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;
