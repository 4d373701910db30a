// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests

#![allow(dead_code)]

use gatewaydns::config::Config;
use gatewaydns::context::{Context, Stores};
use gatewaydns::crd::{DNSPolicy, Gateway};
use kube::client::Client;
use kube::runtime::reflector;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub const NAMESPACE: &str = "test-ns";
pub const POLICY: &str = "p";
pub const GATEWAY: &str = "gw";

pub const POLICY_PATH: &str = "/apis/gatewaydns.io/v1alpha1/namespaces/test-ns/dnspolicies/p";
pub const POLICY_STATUS_PATH: &str =
    "/apis/gatewaydns.io/v1alpha1/namespaces/test-ns/dnspolicies/p/status";
pub const GATEWAYS_PATH: &str = "/apis/gateway.networking.k8s.io/v1/namespaces/test-ns/gateways";
pub const GATEWAY_PATH: &str = "/apis/gateway.networking.k8s.io/v1/namespaces/test-ns/gateways/gw";
pub const GATEWAY_STATUS_PATH: &str =
    "/apis/gateway.networking.k8s.io/v1/namespaces/test-ns/gateways/gw/status";
pub const RECORDS_PATH: &str = "/apis/gatewaydns.io/v1alpha1/namespaces/test-ns/dnsrecords";
pub const PROBES_PATH: &str =
    "/apis/gatewaydns.io/v1alpha1/namespaces/test-ns/dnshealthcheckprobes";
pub const ZONES_PATH: &str = "/apis/gatewaydns.io/v1alpha1/namespaces/test-ns/managedzones";

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

/// Client talking to a wiremock server
pub fn mock_client(server: &MockServer) -> Client {
    let config = kube::Config::new(server.uri().parse().unwrap());
    Client::try_from(config).unwrap()
}

/// Controller context around a mock client with an empty policy store
pub fn mock_context(server: &MockServer) -> Arc<Context> {
    let (reader, _writer) = reflector::store::<DNSPolicy>();
    Arc::new(Context {
        client: mock_client(server),
        stores: Stores {
            dns_policies: reader,
        },
        config: Config::default(),
    })
}

/// `DNSPolicy` targeting [`GATEWAY`] with simple routing and the controller finalizer
pub fn policy_json() -> Value {
    json!({
        "apiVersion": "gatewaydns.io/v1alpha1",
        "kind": "DNSPolicy",
        "metadata": {
            "name": POLICY,
            "namespace": NAMESPACE,
            "uid": "uid-p",
            "generation": 1,
            "resourceVersion": "10",
            "finalizers": ["gatewaydns.io/dns-policy"]
        },
        "spec": {
            "targetRef": {
                "group": "gateway.networking.k8s.io",
                "kind": "Gateway",
                "name": GATEWAY
            },
            "routingStrategy": "simple"
        }
    })
}

pub fn policy() -> DNSPolicy {
    serde_json::from_value(policy_json()).unwrap()
}

/// Gateway with one `api` listener on `host` and the given status
pub fn gateway_json(host: &str, status: Option<Value>) -> Value {
    let mut gw = json!({
        "apiVersion": "gateway.networking.k8s.io/v1",
        "kind": "Gateway",
        "metadata": {
            "name": GATEWAY,
            "namespace": NAMESPACE,
            "generation": 1,
            "resourceVersion": "1"
        },
        "spec": {
            "gatewayClassName": "istio",
            "listeners": [
                {"name": "api", "hostname": host, "port": 80, "protocol": "HTTP"}
            ]
        }
    });
    if let Some(status) = status {
        gw["status"] = status;
    }
    gw
}

pub fn gateway(host: &str, status: Option<Value>) -> Gateway {
    serde_json::from_value(gateway_json(host, status)).unwrap()
}

/// Single-cluster status with one IP serving the `api` listener
pub fn single_cluster_status(ip: &str) -> Value {
    json!({
        "addresses": [{"type": "IPAddress", "value": ip}],
        "listeners": [{"name": "api", "attachedRoutes": 1, "supportedKinds": [], "conditions": []}],
        "conditions": []
    })
}

pub fn zone_json(name: &str, domain: &str) -> Value {
    json!({
        "apiVersion": "gatewaydns.io/v1alpha1",
        "kind": "ManagedZone",
        "metadata": {"name": name, "namespace": NAMESPACE, "resourceVersion": "1"},
        "spec": {"domainName": domain}
    })
}

/// A list response of `kind` holding `items`
pub fn list_json(api_version: &str, kind: &str, items: Vec<Value>) -> Value {
    json!({
        "apiVersion": api_version,
        "kind": format!("{kind}List"),
        "metadata": {"resourceVersion": "1"},
        "items": items
    })
}

/// A Kubernetes `Status` failure body
pub fn status_error(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
}
