// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "merkle_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => {
            tracing::warn!("Metrics disabled, failed to install Prometheus recorder: {}", e);
            return;
        }
    }

    metrics::describe_counter!("merkle_leaves_appended_total", "Total number of leaves appended");
    metrics::describe_counter!("merkle_proofs_generated_total", "Total number of inclusion proofs generated");
    metrics::describe_counter!("merkle_validations_total", "Total number of proof validations");
    metrics::describe_counter!("merkle_persist_failures_total", "Hash log writes that failed");
    metrics::describe_gauge!("merkle_tree_length", "Number of leaves in the tree");
    metrics::describe_histogram!("merkle_replay_duration_seconds", "Time taken to replay the hash log");

    metrics::gauge!("merkle_node_up", 1.0);
}

/// Render metrics in Prometheus text format.
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
