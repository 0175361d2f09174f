use merkle_kernel::{hash_leaf, hash_pair, Digest};
use merkle_node::api::{
    ApiStatus, HashAtResponse, InsertRequest, InsertResponse, ProofResponse, TreeStatusResponse,
    ValidateRequest, ValidateResponse,
};
use merkle_node::engine::Engine;
use merkle_node::server::{build_router, shared, SharedEngine};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower::ServiceExt; // for oneshot

const BASE: &str = "/v1/api/merkletree";
const BODY_LIMIT: usize = 64 * 1024;

fn app() -> (Router, SharedEngine) {
    let state = shared(Engine::in_memory());
    (build_router(state.clone(), BODY_LIMIT), state)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json<T: DeserializeOwned>(app: &Router, uri: &str) -> (StatusCode, T) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, req).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json<B: Serialize, T: DeserializeOwned>(app: &Router, uri: &str, body: &B) -> (StatusCode, T) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    let (status, body) = send(app, req).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn insert(app: &Router, data: &str) -> InsertResponse {
    let (status, resp): (_, InsertResponse) =
        post_json(app, BASE, &InsertRequest { data: data.to_string() }).await;
    assert_eq!(status, StatusCode::OK);
    resp
}

#[tokio::test]
async fn test_status_before_and_after_insert() {
    let (app, _) = app();

    let req = Request::builder().uri(BASE).body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), r#"{"status":true,"tree":null}"#);

    let inserted = insert(&app, "First Leaf").await;
    assert_eq!(inserted.hash, hash_leaf(b"First Leaf"));

    let req = Request::builder().uri(BASE).body(Body::empty()).unwrap();
    let (_, body) = send(&app, req).await;
    let expected = format!(
        r#"{{"status":true,"tree":{{"root":"{}","length":1}}}}"#,
        inserted.hash
    );
    assert_eq!(String::from_utf8(body).unwrap(), expected);
}

#[tokio::test]
async fn test_insert_returns_index_and_hash() {
    let (app, _) = app();

    let first = insert(&app, "TestData").await;
    assert!(first.api.status);
    assert_eq!(first.index, 0);
    assert_eq!(first.hash, hash_leaf(b"TestData"));

    let second = insert(&app, "More").await;
    assert_eq!(second.index, 1);

    let (_, status): (_, TreeStatusResponse) = get_json(&app, BASE).await;
    let tree = status.tree.unwrap();
    assert_eq!(tree.length, 2);
    assert_eq!(tree.root, hash_pair(&first.hash, &second.hash));
}

#[tokio::test]
async fn test_insert_without_data_is_rejected() {
    let (app, state) = app();

    let (status, resp): (_, ApiStatus) =
        post_json(&app, BASE, &serde_json::json!({ "b": 14.6 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!resp.status);
    assert_eq!(resp.error.as_deref(), Some("Missing data field"));

    let (status, _): (_, ApiStatus) = post_json(&app, BASE, &serde_json::json!({ "data": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(state.read().await.is_empty());
}

#[tokio::test]
async fn test_malformed_json_uses_envelope() {
    let (app, _) = app();

    let req = Request::builder()
        .method("POST")
        .uri(BASE)
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert!(status.is_client_error());

    let resp: ApiStatus = serde_json::from_slice(&body).unwrap();
    assert!(!resp.status);
    assert!(resp.error.is_some());
}

#[tokio::test]
async fn test_proof_and_validate_round_trip() {
    let (app, _) = app();
    for data in ["a", "b", "c", "d", "e"] {
        insert(&app, data).await;
    }

    let (status, proof): (_, ProofResponse) = get_json(&app, &format!("{BASE}/hashes/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(proof.index, 2);
    assert_eq!(proof.hashes.len(), 3);
    assert_eq!(proof.hashes[0], hash_leaf(b"d"));

    let req = ValidateRequest {
        data: "c".to_string(),
        index: 2,
        hashes: proof.hashes.clone(),
    };
    let (status, resp): (_, ValidateResponse) = post_json(&app, &format!("{BASE}/validate"), &req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(resp.api.status);
    assert!(resp.exists);

    let wrong = ValidateRequest {
        data: "x".to_string(),
        index: 2,
        hashes: proof.hashes,
    };
    let (_, resp): (_, ValidateResponse) = post_json(&app, &format!("{BASE}/validate"), &wrong).await;
    assert!(resp.api.status);
    assert!(!resp.exists);
}

#[tokio::test]
async fn test_proof_out_of_range() {
    let (app, _) = app();
    insert(&app, "only").await;

    let (status, resp): (_, ApiStatus) = get_json(&app, &format!("{BASE}/hashes/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!resp.status);
    assert!(resp.error.unwrap().contains("out of bounds"));

    let (status, resp): (_, ApiStatus) = get_json(&app, &format!("{BASE}/hashes/nope")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!resp.status);
}

#[tokio::test]
async fn test_validate_out_of_range() {
    let (app, _) = app();
    insert(&app, "only").await;

    let req = ValidateRequest {
        data: "only".to_string(),
        index: 7,
        hashes: vec![],
    };
    let (status, resp): (_, ApiStatus) = post_json(&app, &format!("{BASE}/validate"), &req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!resp.status);
}

#[tokio::test]
async fn test_validate_rejects_bad_hex() {
    let (app, _) = app();
    insert(&app, "a").await;

    let body = serde_json::json!({ "data": "a", "index": 0, "hashes": ["0xzz"] });
    let (status, resp): (_, ApiStatus) = post_json(&app, &format!("{BASE}/validate"), &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!resp.status);
    assert!(resp.error.is_some());

    // a negative index is the same kind of bad field
    let body = serde_json::json!({ "data": "a", "index": -1, "hashes": [] });
    let (status, _): (_, ApiStatus) = post_json(&app, &format!("{BASE}/validate"), &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hash_at_and_dump() {
    let (app, _) = app();
    insert(&app, "a").await;
    insert(&app, "b").await;
    insert(&app, "c").await;

    let (status, resp): (_, HashAtResponse) = get_json(&app, &format!("{BASE}/hash/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp.hash, hash_leaf(b"b"));

    let req = Request::builder()
        .uri(format!("{BASE}/dump"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("Level: 2, Count: 1"));
    assert!(text.contains("Level: 0, Count: 3"));
}

#[tokio::test]
async fn test_hashes_serialize_as_prefixed_hex() {
    let (app, _) = app();
    insert(&app, "a").await;
    insert(&app, "b").await;

    let req = Request::builder()
        .uri(format!("{BASE}/hashes/0"))
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&app, req).await;
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let hex = value["hashes"][0].as_str().unwrap();
    assert!(hex.starts_with("0x"));
    assert_eq!(hex.len(), 66);
    assert_eq!(hex.parse::<Digest>().unwrap(), hash_leaf(b"b"));
}

#[tokio::test]
async fn test_body_limit_enforced() {
    let state = shared(Engine::in_memory());
    let app = build_router(state, 64);

    let big = "x".repeat(1024);
    let req = Request::builder()
        .method("POST")
        .uri(BASE)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&InsertRequest { data: big }).unwrap()))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_metrics_endpoint_responds() {
    let (app, _) = app();
    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
}
