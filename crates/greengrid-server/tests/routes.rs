//! In-process route tests

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use greengrid_carbon::StaticProvider;
use greengrid_engine::{DualGridService, EngineConfig};
use greengrid_server::api::{ErrorBody, HealthResponse};
use greengrid_server::{create_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tokio_test::assert_ok;
use tower::ServiceExt;

fn app() -> Router {
    let provider = StaticProvider::new()
        .with_sample("Berlin", 120.0, 45.0)
        .with_sample("Frankfurt", 95.0, 55.0);
    let service = DualGridService::new(Arc::new(provider), EngineConfig::default());
    create_router(Arc::new(AppState::new(service)))
}

async fn send(req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = assert_ok!(app().oneshot(req).await);
    let status = resp.status();
    let body = assert_ok!(to_bytes(resp.into_body(), usize::MAX).await);
    (status, body.to_vec())
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn health_reports_provider() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.provider, "static");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn providers_listed() {
    let (status, body) = get("/api/v1/providers").await;
    assert_eq!(status, StatusCode::OK);

    let providers: Value = serde_json::from_slice(&body).unwrap();
    let providers = providers.as_array().unwrap();
    assert_eq!(providers.len(), 4);
    assert_eq!(providers[0]["name"], "akamai");
    assert!(providers[0]["edgeCount"].as_u64().unwrap() > 0);
    assert!(providers[0].get("carbonAwareRoutingSupported").is_some());
}

#[tokio::test]
async fn dual_grid_post() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/dual-grid")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"userLocation": "Berlin", "edgeLocation": "Frankfurt", "contentType": "static"}"#,
        ))
        .unwrap();

    let (status, body) = send(req).await;
    assert_eq!(status, StatusCode::OK);

    let result: Value = serde_json::from_slice(&body).unwrap();
    assert!((result["weightedIntensity"].as_f64().unwrap() - 115.0).abs() < 1e-9);
    assert_eq!(result["recommendation"]["action"], "proceed");
    assert_eq!(result["degraded"], false);
}

#[tokio::test]
async fn optimal_edge_query() {
    let (status, body) = get("/api/v1/edges/optimal?userLocation=Berlin&cdnProvider=cloudflare&contentType=video").await;
    assert_eq!(status, StatusCode::OK);

    let edge: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(edge["provider"], "cloudflare");
    assert!(edge["location"]["id"].as_str().unwrap().starts_with("cf-"));
}

#[tokio::test]
async fn alternatives_query_clamps() {
    let (status, body) =
        get("/api/v1/edges/alternatives?userLocation=Berlin&currentEdge=cf-fra&cdnProvider=cloudflare&maxResults=0").await;
    assert_eq!(status, StatusCode::OK);

    let alts: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(alts.as_array().unwrap().len(), 1);

    let (status, body) =
        get("/api/v1/edges/alternatives?userLocation=Berlin&currentEdge=cf-fra&cdnProvider=cloudflare&maxResults=-3").await;
    assert_eq!(status, StatusCode::OK);

    let alts: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(alts.as_array().unwrap().len(), 1);
}

fn post_json(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/dual-grid")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn negative_max_alternatives_clamps() {
    let req = post_json(
        r#"{"userLocation": "Warsaw", "edgeLocation": "Warsaw", "contentType": "video",
            "cdnProvider": "cloudflare", "maxAlternatives": -1}"#,
    );

    let (status, body) = send(req).await;
    assert_eq!(status, StatusCode::OK);

    let result: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(result["recommendation"]["action"], "relocate");
    assert_eq!(result["recommendation"]["alternatives"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_body_is_invalid_request() {
    let (status, body) = send(post_json(r#"{"userLocation": "Berlin", "#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let err: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.kind, "invalid_request");
    assert!(!err.error.is_empty());

    let (status, body) = send(post_json(r#"{"edgeLocation": "Paris"}"#)).await;
    assert!(status.is_client_error());

    let err: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.kind, "invalid_request");
    assert!(err.error.contains("userLocation"), "{}", err.error);
}

#[tokio::test]
async fn missing_query_param_is_invalid_request() {
    let (status, body) = get("/api/v1/edges/optimal?cdnProvider=cloudflare").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let err: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.kind, "invalid_request");
}

#[tokio::test]
async fn unknown_provider_is_not_found() {
    let (status, body) = get("/api/v1/edges/optimal?userLocation=Berlin&cdnProvider=nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let err: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.kind, "unknown_cdn_provider");
}

#[tokio::test]
async fn invalid_coordinate_is_bad_request() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/dual-grid")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"userLocation": "Berlin", "edgeLocation": "Paris",
                "userCoordinate": {"latitude": 123.0, "longitude": 0.0}}"#,
        ))
        .unwrap();

    let (status, body) = send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let err: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.kind, "invalid_coordinate");
}
