// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Finalizer management for namespaced custom resources.
//!
//! A `DNSPolicy` carries a finalizer from the moment it binds a Gateway so that
//! its derived `DNSRecord`s, probes and Gateway back-references are always torn
//! down before the policy disappears.
//!
//! # Example
//!
//! ```rust,ignore
//! use gatewaydns::reconcilers::finalizers::{ensure_finalizer, handle_deletion};
//! use gatewaydns::labels::FINALIZER_DNS_POLICY;
//!
//! async fn reconcile(client: Client, policy: DNSPolicy) -> Result<()> {
//!     if policy.metadata.deletion_timestamp.is_some() {
//!         return handle_deletion(&client, &policy, FINALIZER_DNS_POLICY).await;
//!     }
//!     ensure_finalizer(&client, &policy, FINALIZER_DNS_POLICY).await?;
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use kube::api::{Patch, PatchParams};
use kube::core::NamespaceResourceScope;
use kube::{Api, Client, Resource, ResourceExt};
use serde_json::json;
use tracing::info;

/// Trait for resources that require cleanup operations when being deleted.
///
/// Implement this trait to define the teardown that must complete before the
/// finalizer is removed from a resource.
#[async_trait::async_trait]
pub trait FinalizerCleanup: Resource + ResourceExt + Clone {
    /// Perform cleanup operations before the finalizer is removed.
    ///
    /// # Arguments
    ///
    /// * `client` - Kubernetes client for accessing the API
    ///
    /// # Errors
    ///
    /// If this method returns an error, the finalizer will NOT be removed and
    /// deletion stays blocked until cleanup succeeds on a later reconciliation.
    async fn cleanup(&self, client: &Client) -> Result<()>;
}

/// Whether `finalizer` is present on `resource`.
#[must_use]
pub fn has_finalizer<T: Resource>(resource: &T, finalizer: &str) -> bool {
    resource
        .meta()
        .finalizers
        .as_ref()
        .is_some_and(|f| f.iter().any(|x| x == finalizer))
}

async fn patch_finalizers<T>(client: &Client, resource: &T, finalizers: Vec<String>) -> Result<()>
where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + ResourceExt
        + Clone
        + std::fmt::Debug
        + serde::Serialize
        + for<'de> serde::Deserialize<'de>,
{
    let namespace = resource.namespace().unwrap_or_default();
    let api: Api<T> = Api::namespaced(client.clone(), &namespace);
    // The list is replaced wholesale, so reject the write if the object moved on
    let mut metadata = json!({ "finalizers": finalizers });
    if let Some(resource_version) = resource.resource_version() {
        metadata["resourceVersion"] = json!(resource_version);
    }
    let patch = json!({ "metadata": metadata });
    api.patch(&resource.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

/// Add a finalizer to a resource if not already present.
///
/// Idempotent: no request is made when the finalizer is already there.
///
/// # Arguments
///
/// * `client` - Kubernetes client for accessing the API
/// * `resource` - The resource to add the finalizer to
/// * `finalizer` - The finalizer string to add
///
/// # Errors
///
/// Returns an error if the API patch operation fails.
pub async fn ensure_finalizer<T>(client: &Client, resource: &T, finalizer: &str) -> Result<()>
where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + ResourceExt
        + Clone
        + std::fmt::Debug
        + serde::Serialize
        + for<'de> serde::Deserialize<'de>,
{
    if has_finalizer(resource, finalizer) {
        return Ok(());
    }

    let namespace = resource.namespace().unwrap_or_default();
    let name = resource.name_any();
    info!(
        "Adding finalizer {} to {}/{} {}",
        finalizer,
        namespace,
        name,
        T::kind(&())
    );

    let mut finalizers = resource.meta().finalizers.clone().unwrap_or_default();
    finalizers.push(finalizer.to_string());
    patch_finalizers(client, resource, finalizers).await
}

/// Remove a finalizer from a resource.
///
/// Idempotent: no request is made when the finalizer is already absent.
/// Prefer [`handle_deletion`] when the resource is being deleted, as it runs
/// cleanup first.
///
/// # Errors
///
/// Returns an error if the API patch operation fails.
pub async fn remove_finalizer<T>(client: &Client, resource: &T, finalizer: &str) -> Result<()>
where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + ResourceExt
        + Clone
        + std::fmt::Debug
        + serde::Serialize
        + for<'de> serde::Deserialize<'de>,
{
    if !has_finalizer(resource, finalizer) {
        return Ok(());
    }

    let namespace = resource.namespace().unwrap_or_default();
    let name = resource.name_any();
    info!(
        "Removing finalizer {} from {}/{} {}",
        finalizer,
        namespace,
        name,
        T::kind(&())
    );

    let mut finalizers = resource.meta().finalizers.clone().unwrap_or_default();
    finalizers.retain(|f| f != finalizer);
    patch_finalizers(client, resource, finalizers).await
}

/// Handle resource deletion with cleanup and finalizer removal.
///
/// 1. Logs that the resource is being deleted
/// 2. Calls the resource's [`FinalizerCleanup::cleanup`]
/// 3. Removes the finalizer so Kubernetes can complete the deletion
///
/// Does nothing beyond logging when the finalizer is already gone.
///
/// # Errors
///
/// Returns an error if cleanup or finalizer removal fails. The finalizer then
/// remains and deletion is retried on the next reconciliation.
pub async fn handle_deletion<T>(client: &Client, resource: &T, finalizer: &str) -> Result<()>
where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + ResourceExt
        + FinalizerCleanup
        + Clone
        + std::fmt::Debug
        + serde::Serialize
        + for<'de> serde::Deserialize<'de>,
{
    let namespace = resource.namespace().unwrap_or_default();
    let name = resource.name_any();

    info!("{} {}/{} is being deleted", T::kind(&()), namespace, name);

    if has_finalizer(resource, finalizer) {
        info!(
            "Running cleanup for {} {}/{}",
            T::kind(&()),
            namespace,
            name
        );
        resource.cleanup(client).await?;
        remove_finalizer(client, resource, finalizer).await?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "finalizers_tests.rs"]
mod finalizers_tests;
