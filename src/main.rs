// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context as _, Result};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use clap::Parser;
use futures::StreamExt;
use gatewaydns::{
    config::Config,
    constants::{KIND_DNS_POLICY, METRICS_SERVER_PATH, TOKIO_WORKER_THREADS},
    context::{policies_for_gateway, Context, Stores},
    crd::{DNSHealthCheckProbe, DNSPolicy, DNSRecord, Gateway, ManagedZone},
    metrics,
    reconcilers::{reconcile_dnspolicy, retry::is_conflict},
};
use kube::{
    runtime::{controller::Action, watcher::Config as WatcherConfig, Controller},
    Api, Client, Resource, ResourceExt,
};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct ReconcileError(#[from] anyhow::Error);

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("gatewaydns-controller")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    // Respects RUST_LOG (default: info) and RUST_LOG_FORMAT (json | text)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    let config = Config::parse();

    info!("Starting gatewaydns DNSPolicy controller");
    debug!(?config, "Configuration loaded");

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    let metrics_bind_address = config.metrics_bind_address.clone();

    // Either task exiting is fatal
    tokio::select! {
        result = run_dnspolicy_controller(client, config) => {
            error!("CRITICAL: DNSPolicy controller exited: {:?}", result);
            result
        }
        result = run_metrics_server(&metrics_bind_address) => {
            error!("CRITICAL: metrics server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("metrics server exited unexpectedly without error")
        }
    }
}

/// Api for `K` in the watched namespace, or cluster-wide.
fn scoped_api<K>(client: &Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<DynamicType = (), Scope = kube::core::NamespaceResourceScope>
        + Clone
        + DeserializeOwned
        + Debug,
{
    match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    }
}

/// Run the `DNSPolicy` controller
///
/// Besides the policies themselves, the controller watches:
/// - owned `DNSRecord` and `DNSHealthCheckProbe` objects (drift or deletion)
/// - Gateways, mapped to the policies targeting them or listed in their
///   back-reference annotations
/// - `ManagedZone`s, mapped to every policy in the zone's namespace
async fn run_dnspolicy_controller(client: Client, config: Config) -> Result<()> {
    info!("Starting DNSPolicy controller");

    let namespace = config.watch_namespace.clone();
    let ns = namespace.as_deref();
    match ns {
        Some(ns) => info!("Watching namespace {}", ns),
        None => debug!("Initializing DNSPolicy controller with cluster-wide watch"),
    }

    let controller = Controller::new(scoped_api::<DNSPolicy>(&client, ns), WatcherConfig::default());
    let stores = Stores {
        dns_policies: controller.store(),
    };

    let gateway_stores = stores.clone();
    let zone_stores = stores.clone();

    let ctx = Arc::new(Context {
        client: client.clone(),
        stores,
        config,
    });

    controller
        .owns(
            scoped_api::<DNSRecord>(&client, ns),
            WatcherConfig::default(),
        )
        .owns(
            scoped_api::<DNSHealthCheckProbe>(&client, ns),
            WatcherConfig::default(),
        )
        .watches(
            scoped_api::<Gateway>(&client, ns),
            WatcherConfig::default(),
            move |gateway| policies_for_gateway(&gateway_stores, &gateway),
        )
        .watches(
            scoped_api::<ManagedZone>(&client, ns),
            WatcherConfig::default(),
            move |zone| {
                zone.namespace()
                    .map(|zone_ns| zone_stores.policies_in_namespace(&zone_ns))
                    .unwrap_or_default()
            },
        )
        .shutdown_on_signal()
        .run(reconcile_dnspolicy_wrapper, error_policy, ctx)
        .for_each(|_| futures::future::ready(()))
        .await;

    info!("DNSPolicy controller stopped");
    Ok(())
}

/// Reconcile wrapper for `DNSPolicy`
async fn reconcile_dnspolicy_wrapper(
    policy: Arc<DNSPolicy>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();

    match reconcile_dnspolicy(ctx.clone(), (*policy).clone()).await {
        Ok(action) => {
            info!(
                "Successfully reconciled DNSPolicy: {}/{}",
                policy.namespace().unwrap_or_default(),
                policy.name_any()
            );
            metrics::record_reconciliation_success(KIND_DNS_POLICY, start.elapsed());
            Ok(action)
        }
        Err(e) => {
            error!(
                "Failed to reconcile DNSPolicy {}/{}: {:#}",
                policy.namespace().unwrap_or_default(),
                policy.name_any(),
                e
            );
            metrics::record_reconciliation_error(KIND_DNS_POLICY, start.elapsed());
            let error_type = if is_conflict(&e) { "conflict" } else { "api_error" };
            metrics::record_error(KIND_DNS_POLICY, error_type);
            Err(e.into())
        }
    }
}

/// Error policy for the `DNSPolicy` controller
fn error_policy(_policy: Arc<DNSPolicy>, _err: &ReconcileError, ctx: Arc<Context>) -> Action {
    Action::requeue(Duration::from_secs(ctx.config.error_requeue_secs))
}

/// Metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    match metrics::gather_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Serve Prometheus metrics
async fn run_metrics_server(bind_address: &str) -> Result<()> {
    let app = Router::new().route(METRICS_SERVER_PATH, get(metrics_handler));

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind metrics server to {bind_address}"))?;
    info!("Metrics server listening on {}{}", bind_address, METRICS_SERVER_PATH);

    axum::serve(listener, app)
        .await
        .context("Metrics server error")?;

    Ok(())
}
