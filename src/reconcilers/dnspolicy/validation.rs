// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Gateway status validation.
//!
//! The aggregated status of a multi-cluster Gateway is written by a placement
//! mechanism that prefixes each cluster's contributions:
//!
//! - addresses: `{type: gatewaydns.io/MultiClusterIPAddress, value: "<cluster>/<ip>"}`
//! - listeners: `{name: "<cluster>.<listener>", attachedRoutes: N}`
//!
//! A plain single-cluster Gateway is treated as one cluster named `local`.
//! Validation turns either form into a [`ValidatedStatus`] keyed by cluster.

use super::types::{ClusterStatus, GatewayAddress, ValidatedStatus};
use crate::constants::{
    ADDRESS_TYPE_HOSTNAME, ADDRESS_TYPE_IP, ADDRESS_TYPE_MULTI_CLUSTER_HOSTNAME,
    ADDRESS_TYPE_MULTI_CLUSTER_IP, CLUSTER_ADDRESS_SEPARATOR, CLUSTER_LISTENER_SEPARATOR,
    LOCAL_CLUSTER_NAME,
};
use crate::crd::{GatewayStatus, GatewayStatusAddress};
use crate::policy_errors::GatewayValidationError;
use std::net::IpAddr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AddressKind {
    Ip,
    Hostname,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    Single,
    Multi,
}

/// A missing type means `IPAddress`.
fn classify(address: &GatewayStatusAddress) -> Result<(Scope, AddressKind), GatewayValidationError> {
    match address.r#type.as_deref().unwrap_or(ADDRESS_TYPE_IP) {
        ADDRESS_TYPE_IP => Ok((Scope::Single, AddressKind::Ip)),
        ADDRESS_TYPE_HOSTNAME => Ok((Scope::Single, AddressKind::Hostname)),
        ADDRESS_TYPE_MULTI_CLUSTER_IP => Ok((Scope::Multi, AddressKind::Ip)),
        ADDRESS_TYPE_MULTI_CLUSTER_HOSTNAME => Ok((Scope::Multi, AddressKind::Hostname)),
        other => Err(GatewayValidationError::UnknownAddressType {
            address_type: other.to_string(),
        }),
    }
}

fn parse_value(kind: AddressKind, value: &str) -> Result<GatewayAddress, GatewayValidationError> {
    let malformed = || GatewayValidationError::MalformedAddress {
        value: value.to_string(),
    };
    match kind {
        AddressKind::Ip => value
            .parse::<IpAddr>()
            .map(GatewayAddress::Ip)
            .map_err(|_| malformed()),
        AddressKind::Hostname if value.is_empty() => Err(malformed()),
        AddressKind::Hostname => Ok(GatewayAddress::Hostname(value.to_ascii_lowercase())),
    }
}

/// Split `<cluster>/<value>`; both halves must be non-empty.
fn split_cluster_address(value: &str) -> Result<(&str, &str), GatewayValidationError> {
    match value.split_once(CLUSTER_ADDRESS_SEPARATOR) {
        Some((cluster, rest)) if !cluster.is_empty() && !rest.is_empty() => Ok((cluster, rest)),
        _ => Err(GatewayValidationError::MalformedAddress {
            value: value.to_string(),
        }),
    }
}

/// Validate a Gateway's status and partition it by cluster.
///
/// Checks run in this order so that the most descriptive error wins:
///
/// 1. every address type is known
/// 2. single- and multi-cluster types are not mixed
/// 3. every value parses (`<cluster>/<value>` for multi-cluster types)
///
/// Listener entries are then grouped by cluster. In multi-cluster mode, entries
/// without a `<cluster>.` prefix are ignored.
///
/// # Errors
///
/// Returns a [`GatewayValidationError`] describing the first problem found. A
/// missing status is not an error; it yields an empty [`ValidatedStatus`].
pub fn validate_gateway_status(
    status: Option<&GatewayStatus>,
) -> Result<ValidatedStatus, GatewayValidationError> {
    let Some(status) = status else {
        return Ok(ValidatedStatus::default());
    };

    let classified = status
        .addresses
        .iter()
        .map(|address| classify(address).map(|c| (c, address.value.as_str())))
        .collect::<Result<Vec<_>, _>>()?;

    let has_single = classified.iter().any(|((s, _), _)| *s == Scope::Single);
    let has_multi = classified.iter().any(|((s, _), _)| *s == Scope::Multi);
    if has_single && has_multi {
        return Err(GatewayValidationError::InconsistentAddresses);
    }

    let mut validated = ValidatedStatus {
        multi_cluster: has_multi,
        ..Default::default()
    };

    for ((scope, kind), value) in classified {
        let (cluster, raw) = match scope {
            Scope::Multi => split_cluster_address(value)?,
            Scope::Single => (LOCAL_CLUSTER_NAME, value),
        };
        let address = parse_value(kind, raw)?;
        let entry = validated
            .clusters
            .entry(cluster.to_string())
            .or_insert_with(|| ClusterStatus {
                cluster: cluster.to_string(),
                ..Default::default()
            });
        if !entry.addresses.contains(&address) {
            entry.addresses.push(address);
        }
    }

    for listener in &status.listeners {
        let (cluster, name) = if validated.multi_cluster {
            match listener.name.split_once(CLUSTER_LISTENER_SEPARATOR) {
                Some((cluster, name)) if !cluster.is_empty() && !name.is_empty() => {
                    (cluster, name)
                }
                _ => continue,
            }
        } else {
            (LOCAL_CLUSTER_NAME, listener.name.as_str())
        };
        validated
            .clusters
            .entry(cluster.to_string())
            .or_insert_with(|| ClusterStatus {
                cluster: cluster.to_string(),
                ..Default::default()
            })
            .listeners
            .insert(name.to_string(), listener.attached_routes);
    }

    Ok(validated)
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod validation_tests;
