// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes reconciliation logic for gatewaydns resources.
//!
//! # Reconciliation Architecture
//!
//! gatewaydns follows the standard Kubernetes controller pattern:
//!
//! 1. **Watch** - `DNSPolicy` changes, plus Gateways, `ManagedZone`s and the
//!    objects derived from each policy
//! 2. **Reconcile** - Recompute the desired records, probes and back-references
//! 3. **Converge** - Create, replace or delete only what differs
//! 4. **Status** - Report the outcome on the policy's `Ready` condition
//!
//! # Modules
//!
//! - [`dnspolicy`] - The `DNSPolicy` reconciler and its components
//! - [`finalizers`] - Finalizer add/remove and the cleanup hook
//! - [`resources`] - Generic convergence of derived objects onto a desired set
//! - [`retry`] - Backoff for transient API errors and optimistic-conflict retry
//! - [`status`] - Condition helpers and the policy status updater
//!
//! # Example: Using the Reconciler
//!
//! ```rust,no_run
//! use gatewaydns::context::Context;
//! use gatewaydns::crd::DNSPolicy;
//! use gatewaydns::reconcilers::reconcile_dnspolicy;
//! use std::sync::Arc;
//!
//! async fn reconcile(ctx: Arc<Context>, policy: DNSPolicy) -> anyhow::Result<()> {
//!     let action = reconcile_dnspolicy(ctx, policy).await?;
//!     println!("next: {action:?}");
//!     Ok(())
//! }
//! ```

pub mod dnspolicy;
pub mod finalizers;
pub mod resources;
pub mod retry;
pub mod status;

pub use dnspolicy::reconcile_dnspolicy;
