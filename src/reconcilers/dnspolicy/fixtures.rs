// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Builders for test objects.

use crate::crd::{
    DNSPolicy, DNSPolicySpec, Gateway, GatewaySpec, GatewayStatus, GatewayStatusAddress, Listener,
    ListenerStatus, ManagedZone, ManagedZoneSpec, PolicyTargetReference, RoutingStrategy,
};

pub const MC_IP: &str = "gatewaydns.io/MultiClusterIPAddress";
pub const MC_HOSTNAME: &str = "gatewaydns.io/MultiClusterHostnameAddress";

pub fn policy(name: &str, namespace: &str, gateway: &str) -> DNSPolicy {
    let mut p = DNSPolicy::new(
        name,
        DNSPolicySpec {
            target_ref: PolicyTargetReference {
                group: "gateway.networking.k8s.io".to_string(),
                kind: "Gateway".to_string(),
                name: gateway.to_string(),
            },
            routing_strategy: RoutingStrategy::Simple,
            load_balancing: None,
            health_check: None,
        },
    );
    p.metadata.namespace = Some(namespace.to_string());
    p.metadata.uid = Some(format!("uid-{name}"));
    p.metadata.generation = Some(1);
    p
}

pub fn gateway(name: &str, namespace: &str) -> Gateway {
    let mut gw = Gateway::new(
        name,
        GatewaySpec {
            gateway_class_name: "istio".to_string(),
            listeners: vec![],
        },
    );
    gw.metadata.namespace = Some(namespace.to_string());
    gw.metadata.generation = Some(1);
    gw.metadata.resource_version = Some("1".to_string());
    gw
}

pub fn listener(name: &str, hostname: &str) -> Listener {
    Listener {
        name: name.to_string(),
        hostname: Some(hostname.to_string()),
        port: 80,
        protocol: "HTTP".to_string(),
    }
}

pub fn address(address_type: &str, value: &str) -> GatewayStatusAddress {
    GatewayStatusAddress {
        r#type: Some(address_type.to_string()),
        value: value.to_string(),
    }
}

pub fn listener_status(name: &str, attached_routes: i32) -> ListenerStatus {
    ListenerStatus {
        name: name.to_string(),
        supported_kinds: vec![],
        attached_routes,
        conditions: vec![],
    }
}

/// Gateway with the given listeners and a multi-cluster status in which every
/// cluster serves every listener.
pub fn multi_cluster_gateway(
    name: &str,
    namespace: &str,
    listeners: &[(&str, &str)],
    clusters: &[(&str, &str)],
) -> Gateway {
    let mut gw = gateway(name, namespace);
    gw.spec.listeners = listeners.iter().map(|(n, h)| listener(n, h)).collect();
    gw.status = Some(GatewayStatus {
        addresses: clusters
            .iter()
            .map(|(cluster, ip)| address(MC_IP, &format!("{cluster}/{ip}")))
            .collect(),
        listeners: clusters
            .iter()
            .flat_map(|(cluster, _)| {
                listeners
                    .iter()
                    .map(move |(l, _)| listener_status(&format!("{cluster}.{l}"), 1))
            })
            .collect(),
        conditions: vec![],
    });
    gw
}

pub fn zone(name: &str, namespace: &str, domain: &str) -> ManagedZone {
    let mut z = ManagedZone::new(
        name,
        ManagedZoneSpec {
            domain_name: domain.to_string(),
            description: None,
        },
    );
    z.metadata.namespace = Some(namespace.to_string());
    z
}

/// A `kube::Client` talking to a wiremock server.
pub fn mock_client(server: &wiremock::MockServer) -> kube::Client {
    let config = kube::Config::new(server.uri().parse().unwrap());
    kube::Client::try_from(config).unwrap()
}
