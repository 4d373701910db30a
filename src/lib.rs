// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # gatewaydns - DNSPolicy controller for Kubernetes Gateways
//!
//! gatewaydns keeps DNS records consistent with the addresses and listeners
//! that a (possibly multi-cluster) Gateway reports in its status.
//!
//! ## Overview
//!
//! A `DNSPolicy` targets one Gateway. For every listener whose hostname falls
//! inside a `ManagedZone` the controller derives a `DNSRecord`, either a plain
//! address set (`simple` routing) or a weighted, geo-aware CNAME tree
//! (`loadbalanced` routing). Optional health checks produce one
//! `DNSHealthCheckProbe` per address and host. The Gateway carries
//! back-reference annotations naming the policies bound to it.
//!
//! ## Modules
//!
//! - [`crd`] - Custom Resource Definitions and the Gateway API subset
//! - [`reconcilers`] - The `DNSPolicy` reconciler and its helpers
//! - [`context`] - Shared context and reflector stores for the controller
//! - [`config`] - Command-line and environment configuration
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust,no_run
//! use gatewaydns::crd::{DNSPolicySpec, PolicyTargetReference, RoutingStrategy};
//!
//! let spec = DNSPolicySpec {
//!     target_ref: PolicyTargetReference {
//!         group: "gateway.networking.k8s.io".to_string(),
//!         kind: "Gateway".to_string(),
//!         name: "prod-web".to_string(),
//!     },
//!     routing_strategy: RoutingStrategy::Simple,
//!     load_balancing: None,
//!     health_check: None,
//! };
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod crd;
pub mod labels;
pub mod metrics;
pub mod policy_errors;
pub mod reconcilers;
pub mod status_reasons;
