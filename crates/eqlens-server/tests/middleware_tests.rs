//! Integration tests for the middleware stack
//!
//! These tests verify:
//! - CORS headers are set for configured origins
//! - Preflight requests allow the user header
//! - Unknown origins get no CORS headers

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};

use eqlens_server::config::{Config, CorsConfig};

mod common;
use common::*;

fn app_for_origins(origins: &[&str]) -> axum::Router {
    let mut config = Config::default();
    config.cors = CorsConfig {
        allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
        allow_credentials: true,
    };
    test_app_with(config)
}

#[tokio::test]
async fn test_cors_headers_with_specific_origin() {
    let app = app_for_origins(&["http://dashboard.test"]);

    let request = Request::builder()
        .uri("/api/v1/health")
        .header(header::ORIGIN, "http://dashboard.test")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://dashboard.test"
    );
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_cors_preflight_allows_user_header() {
    let app = app_for_origins(&["http://dashboard.test"]);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/datasets")
        .header(header::ORIGIN, "http://dashboard.test")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-user-id")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("x-user-id"));
}

#[tokio::test]
async fn test_cors_unknown_origin_gets_no_header() {
    let app = app_for_origins(&["http://dashboard.test"]);

    let request = Request::builder()
        .uri("/api/v1/health")
        .header(header::ORIGIN, "http://elsewhere.test")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_wildcard_origin() {
    let mut config = Config::default();
    config.cors = CorsConfig {
        allowed_origins: vec!["*".to_string()],
        allow_credentials: false,
    };
    let app = test_app_with(config);

    let request = Request::builder()
        .uri("/api/v1/health")
        .header(header::ORIGIN, "http://anywhere.test")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
