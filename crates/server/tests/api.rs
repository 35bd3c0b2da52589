//! Router-level tests exercising the HTTP surface without a socket.
//!
//! OneDrive credentials are absent in these tests, which is exactly the
//! environment the degrade-gracefully paths exist for.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use catalog_server::config::Config;
use catalog_server::routes;
use catalog_server::state::AppState;

fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        host: "127.0.0.1".parse().expect("ip"),
        port: 0,
        frontend_dir: dir.path().join("frontend"),
        token_cache_path: dir.path().join("token_cache.json"),
        azure: None,
    };
    (routes::app(AppState::new(config)), dir)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_photos_missing_share_url_is_400() {
    let (app, _dir) = test_app();
    let (status, body) = get(app, "/catalog/photos").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_photos_without_credentials_serves_placeholders() {
    let (app, _dir) = test_app();
    let (status, body) = get(app, "/catalog/photos?shareUrl=x&code=y").await;
    assert_eq!(status, StatusCode::OK);
    for slot in ["white_background", "ambient", "measures"] {
        let url = body[slot].as_str().expect("slot url");
        assert!(url.starts_with("https://placehold.co/"));
        assert!(url.ends_with("+y"));
    }
}

#[tokio::test]
async fn test_photos_placeholders_without_code() {
    let (app, _dir) = test_app();
    let (status, body) = get(app, "/catalog/photos?shareUrl=x").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["white_background"].as_str(),
        Some("https://placehold.co/150x150?text=Branco")
    );
}

#[tokio::test]
async fn test_product_images_missing_share_url_is_400() {
    let (app, _dir) = test_app();
    let (status, body) = get(app, "/catalog/produtos/6649/imagens").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_sheet_missing_url_is_400() {
    let (app, _dir) = test_app();
    let (status, body) = get(app, "/catalog/sheet").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_sheet_invalid_url_is_400() {
    let (app, _dir) = test_app();
    let (status, body) = get(app, "/catalog/sheet?url=https://example.com/not-a-sheet").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"].as_str(), Some("Invalid Google Sheets URL"));
}

#[tokio::test]
async fn test_items_is_empty_list() {
    let (app, _dir) = test_app();
    let (status, body) = get(app, "/catalog/items").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(Vec::new()));
}

#[tokio::test]
async fn test_login_without_credentials_is_500() {
    let (app, _dir) = test_app();
    let (status, body) = get(app, "/auth/login").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_callback_missing_code_is_400() {
    let (app, _dir) = test_app();
    let (status, body) = get(app, "/auth/callback").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"].as_str(), Some("Missing code"));
}

#[tokio::test]
async fn test_callback_provider_error_is_400() {
    let (app, _dir) = test_app();
    let (status, body) = get(app, "/auth/callback?error=access_denied").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"].as_str(), Some("access_denied"));
}
