// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use merkle_node::config::NodeConfig;
use merkle_node::recovery::recover;
use merkle_node::server::{build_router, shared};
use merkle_node::telemetry::init_telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_telemetry();

    let cfg = NodeConfig::from_env()?;
    tracing::info!("Initializing Merkle Node with config: {:?}", cfg);

    // A damaged hash log stops startup rather than serving a partial tree.
    let engine = recover(&cfg)?;
    tracing::info!("Tree ready with {} leaves", engine.len());

    let app = build_router(shared(engine), cfg.max_body_bytes);

    let listener = TcpListener::bind(cfg.bind_addr).await?;
    tracing::info!("Listening on {}", cfg.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
