use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use agromind_core::{Engine, ModelConfig};

use crate::{config::Config, create_router, AppState};

const BOUNDARY: &str = "agromind-test-boundary";

/// Router over an empty model directory: every answer comes from fallbacks
fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(ModelConfig::in_dir(dir.path()));
    let state = AppState {
        engine: Arc::new(engine),
        config: Config::default(),
    };
    (create_router(state), dir)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"upload\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/v1/ml/pest-detection")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn wet_hot_features() -> Value {
    json!({
        "N": 90.0, "P": 42.0, "K": 43.0,
        "temperature": 30.0, "humidity": 82.0, "ph": 6.5, "rainfall": 250.0
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["crop_model_loaded"], false);
}

#[tokio::test]
async fn test_crop_recommendation_fallback() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(json_request("/api/v1/ml/crop-recommendation", wet_hot_features()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["crop_name"], "rice");
    assert_eq!(body["method"], "rule_based");
}

#[tokio::test]
async fn test_top_crops_fallback() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(json_request("/api/v1/ml/crop-recommendation/top?k=3", wet_hot_features()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let crops = body["recommended_crops"].as_array().unwrap();
    assert_eq!(crops.len(), 1);
    assert_eq!(crops[0]["crop_name"], "rice");
    assert!(body["reasoning"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn test_top_crops_rejects_zero_k() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(json_request("/api/v1/ml/crop-recommendation/top?k=0", wet_hot_features()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "k must be at least 1");
}

#[tokio::test]
async fn test_crop_recommendation_rejects_missing_fields() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(json_request("/api/v1/ml/crop-recommendation", json!({"N": 1.0})))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_pest_detection_rejects_non_image() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(multipart_request("image", "text/plain", b"hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "File must be an image");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_pest_detection_missing_field() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(multipart_request("photo", "image/png", b"\x89PNG"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pest_detection_without_model_returns_error_report() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(multipart_request("image", "image/jpeg", b"not really a jpeg"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["method"], "error");
    assert_eq!(body["confidence"], 0.0);
}

#[tokio::test]
async fn test_status_reports_models() {
    let (app, _dir) = test_app();
    let response = tokio_test::assert_ok!(
        app.oneshot(Request::builder().uri("/api/v1/ml/status").body(Body::empty()).unwrap())
            .await
    );

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["app_name"], "Agromind AI");
    assert_eq!(body["crop_model"]["loaded"], false);
    assert_eq!(body["crop_model"]["status"], "unloaded");
}
