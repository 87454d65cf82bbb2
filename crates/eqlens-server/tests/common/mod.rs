//! Shared helpers for router tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use eqlens_server::{api::create_router, config::Config, repository::InMemoryRepository};

pub const USER: &str = "alice";
pub const BOUNDARY: &str = "eqlens-test-boundary";

pub const SAMPLE_CSV: &str = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
Pump-1,Pump,10,5,40
Valve-1,Valve,20,3,30
Pump-2,Pump,30,7,50
";

pub fn test_app() -> Router {
    test_app_with(Config::default())
}

pub fn test_app_with(config: Config) -> Router {
    create_router(Arc::new(InMemoryRepository::new()), &config)
}

/// Multipart body with one part named `field`
pub fn multipart_body(field: &str, filename: &str, content: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    )
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, user: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn delete(app: &Router, uri: &str, user: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("x-user-id", user)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn upload_raw(app: &Router, user: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/datasets")
        .header("x-user-id", user)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn upload(app: &Router, user: &str, filename: &str, csv: &str) -> Response<Body> {
    upload_raw(app, user, multipart_body("file", filename, csv)).await
}

/// Upload and return the new dataset id
pub async fn upload_id(app: &Router, user: &str, filename: &str, csv: &str) -> String {
    let body = body_json(upload(app, user, filename, csv).await).await;
    body["data"]["dataset"]["id"].as_str().unwrap().to_string()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
