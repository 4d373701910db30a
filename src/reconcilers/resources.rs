// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Converge a set of derived Kubernetes objects onto a desired set.
//!
//! Derived objects (`DNSRecord`, `DNSHealthCheckProbe`) are identified by labels
//! naming the policy that produced them. A sync lists the labeled objects and then:
//!
//! - **Creates** desired objects that do not exist
//! - **Replaces** existing objects whose content differs from the desired one
//! - **Deletes** labeled objects that are no longer desired
//! - **Skips** desired names already taken by an object that is not labeled as ours
//!
//! Objects that already match are not written, so a converged sync makes no writes.
//!
//! # Example
//!
//! ```rust,ignore
//! use gatewaydns::reconcilers::resources::sync_derived;
//!
//! let outcome = sync_derived(&client, "ns", &selector, desired_records).await?;
//! info!("{} created, {} updated, {} deleted", outcome.created, outcome.updated, outcome.deleted);
//! ```

use crate::constants::FIELD_MANAGER;
use crate::metrics;
use crate::reconcilers::retry::retry_api_call;
use anyhow::{Context as _, Result};
use kube::api::{DeleteParams, ListParams, PostParams};
use kube::core::NamespaceResourceScope;
use kube::{Api, Client, Resource, ResourceExt};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A derived object kept in line with a desired copy.
pub trait DerivedResource:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + ResourceExt
    + Clone
    + std::fmt::Debug
    + serde::Serialize
    + for<'de> serde::Deserialize<'de>
    + Send
    + Sync
    + 'static
{
    /// Whether this (existing) object already carries the desired content.
    fn matches(&self, desired: &Self) -> bool;
}

/// Counts of the writes a sync made.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Desired objects not written because the name belongs to someone else
    pub skipped: usize,
}

impl SyncOutcome {
    /// Total number of write requests made.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

fn post_params() -> PostParams {
    PostParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..Default::default()
    }
}

fn is_api_reason(err: &kube::Error, reason: &str) -> bool {
    matches!(err, kube::Error::Api(ae) if ae.reason == reason)
}

/// List the objects of type `T` in `namespace` matching `label_selector`.
///
/// # Errors
///
/// Returns an error if the list call fails after retries.
pub async fn list_labeled<T: DerivedResource>(
    client: &Client,
    namespace: &str,
    label_selector: &str,
) -> Result<Vec<T>> {
    let api: Api<T> = Api::namespaced(client.clone(), namespace);
    let lp = ListParams::default().labels(label_selector);
    let list = retry_api_call(
        || api.list(&lp),
        &format!("list {} in {namespace}", T::kind(&())),
    )
    .await?;
    Ok(list.items)
}

/// Delete one object, treating `NotFound` as success.
///
/// # Returns
///
/// `true` if a delete was issued for an object that existed.
///
/// # Errors
///
/// Returns an error if the delete call fails for any other reason.
pub async fn delete_if_exists<T: DerivedResource>(
    client: &Client,
    namespace: &str,
    name: &str,
) -> Result<bool> {
    let api: Api<T> = Api::namespaced(client.clone(), namespace);
    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => {
            info!("Deleted {} {}/{}", T::kind(&()), namespace, name);
            metrics::record_resource_deleted(&T::kind(&()));
            Ok(true)
        }
        Err(e) if is_api_reason(&e, "NotFound") => {
            debug!("{} {}/{} already gone", T::kind(&()), namespace, name);
            Ok(false)
        }
        Err(e) => {
            Err(e).with_context(|| format!("delete {} {namespace}/{name}", T::kind(&())))
        }
    }
}

/// Delete every object of type `T` in `namespace` matching `label_selector`.
///
/// # Returns
///
/// Number of objects deleted.
///
/// # Errors
///
/// Returns an error if listing or any delete fails.
pub async fn delete_labeled<T: DerivedResource>(
    client: &Client,
    namespace: &str,
    label_selector: &str,
) -> Result<usize> {
    let mut deleted = 0;
    for obj in list_labeled::<T>(client, namespace, label_selector).await? {
        if delete_if_exists::<T>(client, namespace, &obj.name_any()).await? {
            deleted += 1;
        }
    }
    Ok(deleted)
}

/// Converge the labeled objects of type `T` onto `desired`.
///
/// # Arguments
///
/// * `client` - Kubernetes API client
/// * `namespace` - Namespace of the derived objects
/// * `label_selector` - Selector matching every object this owner produced
/// * `desired` - Complete desired set; every object must carry a name and the labels
///
/// # Errors
///
/// Returns an error if any list, create, replace or delete call fails. Writes
/// already made are kept; the next sync picks up from the observed state.
pub async fn sync_derived<T: DerivedResource>(
    client: &Client,
    namespace: &str,
    label_selector: &str,
    desired: Vec<T>,
) -> Result<SyncOutcome> {
    let api: Api<T> = Api::namespaced(client.clone(), namespace);
    let kind = T::kind(&());
    let mut outcome = SyncOutcome::default();

    let mut existing: BTreeMap<String, T> = list_labeled::<T>(client, namespace, label_selector)
        .await?
        .into_iter()
        .map(|obj| (obj.name_any(), obj))
        .collect();

    for mut want in desired {
        let name = want.name_any();
        match existing.remove(&name) {
            Some(have) if have.matches(&want) => {
                debug!("{} {}/{} up to date", kind, namespace, name);
            }
            Some(have) => {
                want.meta_mut().resource_version = have.resource_version();
                api.replace(&name, &post_params(), &want)
                    .await
                    .with_context(|| format!("replace {kind} {namespace}/{name}"))?;
                info!("Updated {} {}/{}", kind, namespace, name);
                metrics::record_resource_updated(&kind);
                outcome.updated += 1;
            }
            None => {
                let taken = api
                    .get_opt(&name)
                    .await
                    .with_context(|| format!("get {kind} {namespace}/{name}"))?
                    .is_some();
                if taken {
                    warn!(
                        "{} {}/{} exists but is not owned by this policy, skipping",
                        kind, namespace, name
                    );
                    outcome.skipped += 1;
                    continue;
                }
                match api.create(&post_params(), &want).await {
                    Ok(_) => {
                        info!("Created {} {}/{}", kind, namespace, name);
                        metrics::record_resource_created(&kind);
                        outcome.created += 1;
                    }
                    // Lost a race with another writer
                    Err(e) if is_api_reason(&e, "AlreadyExists") => {
                        warn!(
                            "{} {}/{} exists but is not owned by this policy, skipping",
                            kind, namespace, name
                        );
                        outcome.skipped += 1;
                    }
                    Err(e) => {
                        return Err(e)
                            .with_context(|| format!("create {kind} {namespace}/{name}"));
                    }
                }
            }
        }
    }

    for (name, _) in existing {
        if delete_if_exists::<T>(client, namespace, &name).await? {
            outcome.deleted += 1;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
#[path = "resources_tests.rs"]
mod resources_tests;
