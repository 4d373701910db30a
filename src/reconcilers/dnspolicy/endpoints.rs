// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Endpoint synthesis for a published listener.
//!
//! # Routing Strategies
//!
//! - **simple** - one answer for the host holding every cluster's addresses
//! - **loadbalanced** - a CNAME tree rooted at the host:
//!
//! ```text
//! api.example.com               CNAME lb-<gw>.api.example.com
//! lb-<gw>.api.example.com       CNAME <geo>.lb-<gw>.api.example.com        (one per geo)
//! <geo>.lb-<gw>.api.example.com CNAME <cluster>-<gw>.lb-<gw>.api.example.com (weighted)
//! <cluster>-<gw>.lb-<gw>...     A     <cluster addresses>
//! ```
//!
//! Each cluster owns its own leaf, so a change in one cluster only rewrites that
//! cluster's leaf and weighted entry.

use super::types::{ClusterStatus, GatewayAddress, ListenerTarget};
use crate::config::Config;
use crate::constants::{
    DEFAULT_GEO_SET_IDENTIFIER, ENDPOINT_LABEL_CLUSTER, LB_NAME_PREFIX, PROVIDER_PROPERTY_GEO_CODE,
    PROVIDER_PROPERTY_WEIGHT, SHORT_HASH_LEN, WILDCARD_GEO_CODE,
};
use crate::crd::{CustomGeo, CustomWeight, DNSPolicy, Endpoint, ProviderSpecificProperty, RoutingStrategy};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

const RECORD_TYPE_A: &str = "A";
const RECORD_TYPE_AAAA: &str = "AAAA";
const RECORD_TYPE_CNAME: &str = "CNAME";

/// First [`SHORT_HASH_LEN`] hex characters of the SHA-256 of `input`.
#[must_use]
pub fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(SHORT_HASH_LEN);
    hex
}

/// TTLs, weights and geos in effect for one policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointSettings {
    pub strategy: RoutingStrategy,
    pub ttl: i64,
    pub cname_ttl: i64,
    pub default_weight: i64,
    pub default_geo: Option<String>,
    pub custom_weights: Vec<CustomWeight>,
    pub custom_geos: Vec<CustomGeo>,
}

impl EndpointSettings {
    /// Settings from the policy's `loadBalancing`, falling back to the controller config.
    #[must_use]
    pub fn resolve(policy: &DNSPolicy, config: &Config) -> Self {
        let lb = policy.spec.load_balancing.as_ref();
        let weighted = lb.and_then(|l| l.weighted.as_ref());
        let geo = lb.and_then(|l| l.geo.as_ref());

        Self {
            strategy: policy.spec.routing_strategy,
            ttl: config.default_ttl,
            cname_ttl: config.default_cname_ttl,
            default_weight: weighted
                .and_then(|w| w.default_weight)
                .unwrap_or(config.default_weight),
            default_geo: geo
                .and_then(|g| g.default_geo.clone())
                .or_else(|| config.default_geo.clone()),
            custom_weights: weighted.map(|w| w.custom.clone()).unwrap_or_default(),
            custom_geos: geo.map(|g| g.custom.clone()).unwrap_or_default(),
        }
    }

    /// Weight of `cluster`; the first custom entry listing it wins.
    #[must_use]
    pub fn weight_for(&self, cluster: &str) -> i64 {
        self.custom_weights
            .iter()
            .find(|w| w.clusters.iter().any(|c| c == cluster))
            .map_or(self.default_weight, |w| w.weight)
    }

    /// Geo of `cluster`, or the default geo, or `default` when none is configured.
    #[must_use]
    pub fn geo_for(&self, cluster: &str) -> String {
        self.custom_geos
            .iter()
            .find(|g| g.clusters.iter().any(|c| c == cluster))
            .map(|g| g.geo.clone())
            .or_else(|| self.default_geo.clone())
            .unwrap_or_else(|| DEFAULT_GEO_SET_IDENTIFIER.to_string())
    }
}

fn endpoint(dns_name: &str, record_type: &str, targets: Vec<String>, ttl: i64) -> Endpoint {
    Endpoint {
        dns_name: dns_name.to_string(),
        targets,
        record_type: record_type.to_string(),
        record_ttl: Some(ttl),
        ..Default::default()
    }
}

fn property(name: &str, value: impl Into<String>) -> ProviderSpecificProperty {
    ProviderSpecificProperty {
        name: name.to_string(),
        value: value.into(),
    }
}

/// Answers for `dns_name` from a set of addresses.
///
/// IPv4 and IPv6 addresses become one `A` and one `AAAA` answer. Hostnames are
/// only used when there are no IPs, as a `CNAME` to the first one in sort order.
fn address_endpoints<'a>(
    dns_name: &str,
    addresses: impl IntoIterator<Item = &'a GatewayAddress>,
    ttl: i64,
) -> Vec<Endpoint> {
    let mut v4 = BTreeSet::new();
    let mut v6 = BTreeSet::new();
    let mut hostnames = BTreeSet::new();
    for address in addresses {
        match address {
            GatewayAddress::Ip(ip) if ip.is_ipv4() => {
                v4.insert(ip.to_string());
            }
            GatewayAddress::Ip(ip) => {
                v6.insert(ip.to_string());
            }
            GatewayAddress::Hostname(h) => {
                hostnames.insert(h.clone());
            }
        }
    }

    let mut out = Vec::new();
    if !v4.is_empty() {
        out.push(endpoint(dns_name, RECORD_TYPE_A, v4.into_iter().collect(), ttl));
    }
    if !v6.is_empty() {
        out.push(endpoint(dns_name, RECORD_TYPE_AAAA, v6.into_iter().collect(), ttl));
    }
    if out.is_empty() {
        if let Some(first) = hostnames.into_iter().next() {
            out.push(endpoint(dns_name, RECORD_TYPE_CNAME, vec![first], ttl));
        }
    }
    out
}

/// Endpoints for `simple` routing.
#[must_use]
pub fn simple_endpoints(
    target: &ListenerTarget,
    clusters: &[&ClusterStatus],
    settings: &EndpointSettings,
) -> Vec<Endpoint> {
    address_endpoints(
        &target.host,
        clusters.iter().flat_map(|c| c.addresses.iter()),
        settings.ttl,
    )
}

/// Endpoints for `loadbalanced` routing.
///
/// # Arguments
///
/// * `gateway_key` - `<namespace>/<name>` of the Gateway, hashed into every generated name
/// * `target` - The listener being published
/// * `clusters` - Clusters serving the listener
/// * `settings` - Weights, geos and TTLs
#[must_use]
pub fn load_balanced_endpoints(
    gateway_key: &str,
    target: &ListenerTarget,
    clusters: &[&ClusterStatus],
    settings: &EndpointSettings,
) -> Vec<Endpoint> {
    let gw_hash = short_hash(gateway_key);
    let base = target.host.strip_prefix("*.").unwrap_or(&target.host);
    let lb_host = format!("{LB_NAME_PREFIX}{gw_hash}.{base}");

    let mut out = vec![endpoint(
        &target.host,
        RECORD_TYPE_CNAME,
        vec![lb_host.clone()],
        settings.cname_ttl,
    )];

    let mut by_geo: BTreeMap<String, Vec<&ClusterStatus>> = BTreeMap::new();
    for cluster in clusters {
        by_geo
            .entry(settings.geo_for(&cluster.cluster))
            .or_default()
            .push(cluster);
    }

    for (geo, members) in &by_geo {
        let geo_host = format!("{}.{lb_host}", geo.to_ascii_lowercase());

        let mut geo_entry = endpoint(
            &lb_host,
            RECORD_TYPE_CNAME,
            vec![geo_host.clone()],
            settings.cname_ttl,
        );
        if geo == DEFAULT_GEO_SET_IDENTIFIER {
            geo_entry.set_identifier = DEFAULT_GEO_SET_IDENTIFIER.to_string();
            geo_entry.provider_specific = vec![property(PROVIDER_PROPERTY_GEO_CODE, WILDCARD_GEO_CODE)];
        } else {
            geo_entry.set_identifier.clone_from(geo);
            geo_entry.provider_specific = vec![property(PROVIDER_PROPERTY_GEO_CODE, geo.as_str())];
        }
        out.push(geo_entry);

        if settings.default_geo.as_deref() == Some(geo.as_str()) {
            let mut catch_all = endpoint(
                &lb_host,
                RECORD_TYPE_CNAME,
                vec![geo_host.clone()],
                settings.cname_ttl,
            );
            catch_all.set_identifier = DEFAULT_GEO_SET_IDENTIFIER.to_string();
            catch_all.provider_specific = vec![property(PROVIDER_PROPERTY_GEO_CODE, WILDCARD_GEO_CODE)];
            out.push(catch_all);
        }

        for cluster in members {
            let leaf = format!("{}-{gw_hash}.{lb_host}", short_hash(&cluster.cluster));

            let mut weighted = endpoint(
                &geo_host,
                RECORD_TYPE_CNAME,
                vec![leaf.clone()],
                settings.cname_ttl,
            );
            weighted.set_identifier.clone_from(&leaf);
            weighted.provider_specific = vec![property(
                PROVIDER_PROPERTY_WEIGHT,
                settings.weight_for(&cluster.cluster).to_string(),
            )];
            out.push(weighted);

            for mut answer in address_endpoints(&leaf, &cluster.addresses, settings.ttl) {
                answer
                    .labels
                    .insert(ENDPOINT_LABEL_CLUSTER.to_string(), cluster.cluster.clone());
                out.push(answer);
            }
        }
    }

    out
}

/// Endpoints for `target` under the strategy in `settings`, in canonical order.
#[must_use]
pub fn build_endpoints(
    gateway_key: &str,
    target: &ListenerTarget,
    clusters: &[&ClusterStatus],
    settings: &EndpointSettings,
) -> Vec<Endpoint> {
    let mut endpoints = match settings.strategy {
        RoutingStrategy::Simple => simple_endpoints(target, clusters, settings),
        RoutingStrategy::LoadBalanced => {
            load_balanced_endpoints(gateway_key, target, clusters, settings)
        }
    };
    endpoints.sort();
    endpoints.dedup();
    endpoints
}

#[cfg(test)]
#[path = "endpoints_tests.rs"]
mod endpoints_tests;
