// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        DefaultBodyLimit, Path, State,
    },
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::*;
use crate::engine::Engine;
use crate::errors::EngineError;

/// Readers share the lock; only insert takes it exclusively.
pub type SharedEngine = Arc<RwLock<Engine>>;

pub const API_PREFIX: &str = "/v1/api/merkletree";

pub fn shared(engine: Engine) -> SharedEngine {
    Arc::new(RwLock::new(engine))
}

pub fn build_router(state: SharedEngine, max_body_bytes: usize) -> Router {
    let tree_routes = Router::new()
        .route("/", get(tree_status).post(insert))
        .route("/hashes/:index", get(proof))
        .route("/hash/:index", get(hash_at))
        .route("/validate", axum::routing::post(validate))
        .route("/dump", get(dump));

    Router::new()
        .nest(API_PREFIX, tree_routes)
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn tree_status(
    State(state): State<SharedEngine>,
) -> Result<Json<TreeStatusResponse>, EngineError> {
    let engine = state.read().await;
    Ok(Json(TreeStatusResponse {
        api: ApiStatus::ok(),
        tree: engine.status()?,
    }))
}

async fn insert(
    State(state): State<SharedEngine>,
    payload: Result<Json<InsertRequest>, JsonRejection>,
) -> Result<Json<InsertResponse>, EngineError> {
    let Json(payload) = payload?;
    if payload.data.is_empty() {
        return Err(EngineError::MalformedInput("Missing data field".to_string()));
    }

    let mut engine = state.write().await;
    let (index, hash) = engine.add(payload.data.as_bytes());
    Ok(Json(InsertResponse {
        api: ApiStatus::ok(),
        index,
        hash,
    }))
}

async fn proof(
    State(state): State<SharedEngine>,
    index: Result<Path<usize>, PathRejection>,
) -> Result<Json<ProofResponse>, EngineError> {
    let Path(index) = index?;
    let engine = state.read().await;
    let hashes = engine.proof_for(index)?;
    Ok(Json(ProofResponse {
        api: ApiStatus::ok(),
        index,
        hashes,
    }))
}

async fn hash_at(
    State(state): State<SharedEngine>,
    index: Result<Path<usize>, PathRejection>,
) -> Result<Json<HashAtResponse>, EngineError> {
    let Path(index) = index?;
    let engine = state.read().await;
    let hash = engine.hash_at(index)?;
    Ok(Json(HashAtResponse {
        api: ApiStatus::ok(),
        index,
        hash,
    }))
}

async fn validate(
    State(state): State<SharedEngine>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, EngineError> {
    let Json(req) = payload?;
    if req.data.is_empty() {
        return Err(EngineError::MalformedInput("Missing data field".to_string()));
    }

    let engine = state.read().await;
    let exists = engine.verify(req.data.as_bytes(), req.index, &req.hashes)?;
    Ok(Json(ValidateResponse {
        api: ApiStatus::ok(),
        exists,
    }))
}

async fn dump(State(state): State<SharedEngine>) -> String {
    state.read().await.dump()
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
