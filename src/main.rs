/* Copyright (C) 2025 Pedro Henrique / phkaiser13
* Archive: src/main.rs
*
* This file is the entry point for scalepilot, a single-shot tool that
* raises the minimum replica counts of a set of HorizontalPodAutoscalers
* ahead of a traffic event and reverts them after a hold window.
*
* Architecture:
* 1.  **Initialization**: structured logging is configured first, filtered
*     via RUST_LOG with an `info` default.
* 2.  **Configuration**: the immutable RunConfig is read from the
*     environment and the event catalog from its YAML file; the requested
*     event resolves to an ordered list of service targets. Any failure
*     here terminates the run before the cluster is touched.
* 3.  **Cluster access**: a Kubernetes client is built via the standard
*     resolution chain (kubeconfig locally, the service account when
*     running inside a cluster) and scoped to the configured namespace.
* 4.  **Lifecycle**: the orchestrator drives apply -> hold -> revert. The
*     process exits 0 when the revert phase completes, even if individual
*     reverts failed; every earlier failure exits non-zero.
*
* SPDX-License-Identifier: Apache-2.0 */

use kube::Client;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod catalog;
mod config;
mod error;
mod hpa;
mod notify;
mod orchestrator;

use catalog::EventCatalog;
use config::RunConfig;
use error::Result;
use hpa::KubeAutoscalers;
use notify::Notifier;
use orchestrator::ScaleOrchestrator;

async fn run() -> Result<()> {
    // 1. Process configuration and event catalog
    let config = RunConfig::from_env()?;
    let catalog = EventCatalog::load(&config.catalog_path)?;
    let targets = catalog.resolve(&config.event_name)?;

    // 2. Cluster client, scoped to the configured namespace
    let client = Client::try_default().await?;
    let autoscalers = KubeAutoscalers::new(client, &config.namespace);
    let notifier = Notifier::new(&config.webhook_url, config.notifications_enabled);

    // 3. Drive the event lifecycle
    ScaleOrchestrator::new(autoscalers, notifier, config.hold)
        .run(&config.event_name, targets)
        .await
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}
