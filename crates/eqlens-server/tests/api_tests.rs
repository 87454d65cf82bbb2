//! Router tests against the in-memory repository
//!
//! These tests verify:
//! - Caller identification through the `x-user-id` header
//! - Upload, listing, retrieval and deletion of datasets
//! - Derived views (distribution, raw columns, charts, PDF report)
//! - Error codes and statuses

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

mod common;
use common::*;

const HEADER_ONLY_CSV: &str = "Equipment Name,Type,Flowrate,Pressure,Temperature\n";

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let response = get(&app, "/api/v1/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_root() {
    let app = test_app();
    let body = body_json(get(&app, "/", None).await).await;
    assert_eq!(body["name"], "eqlens");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = test_app();
    let response = get(&app, "/api/v1/nothing-here", Some(USER)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_missing_user_header_is_unauthorized() {
    let app = test_app();
    let response = get(&app, "/api/v1/datasets", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_upload_dataset() {
    let app = test_app();
    let response = upload(&app, USER, "pumps.csv", SAMPLE_CSV).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["dataset"]["filename"], "pumps.csv");
    assert_eq!(data["dataset"]["total_count"], 3);
    assert_eq!(data["dataset"]["avg_flowrate"], 20.0);
    assert_eq!(data["dataset"]["avg_temperature"], 40.0);
    assert_eq!(data["warning_count"], 0);
    assert_eq!(data["evicted"], json!([]));
}

#[tokio::test]
async fn test_upload_reports_warnings() {
    let app = test_app();
    let csv = "Equipment Name,Type,Flowrate\nP1,Pump,fast\n";
    let body = body_json(upload(&app, USER, "partial.csv", csv).await).await;

    // Pressure and Temperature columns missing, Flowrate not numeric
    assert_eq!(body["data"]["warning_count"], 3);
    assert_eq!(body["data"]["dataset"]["avg_flowrate"], 0.0);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = test_app();
    let response = upload_raw(&app, USER, multipart_body("attachment", "a.csv", SAMPLE_CSV)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_upload_truncated_multipart() {
    let app = test_app();
    let body = multipart_body("file", "pumps.csv", SAMPLE_CSV);
    // cut inside the file part so the closing boundary never arrives
    let truncated = body[..body.len() - 30].to_string();

    let response = upload_raw(&app, USER, truncated).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_upload_without_multipart_content_type() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/datasets")
        .header("x-user-id", USER)
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(SAMPLE_CSV))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_upload_malformed_csv() {
    let app = test_app();
    let csv = "Equipment Name,Type\nP1,Pump,extra,cells\n";
    let response = upload(&app, USER, "bad.csv", csv).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "MALFORMED_INPUT");
}

#[tokio::test]
async fn test_upload_over_limit() {
    let mut config = eqlens_server::config::Config::default();
    config.server.max_upload_bytes = 64;
    let app = test_app_with(config);

    let body = multipart_body("file", "pumps.csv", SAMPLE_CSV);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/datasets")
        .header("x-user-id", USER)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_list_datasets_newest_first() {
    let app = test_app();
    upload_id(&app, USER, "first.csv", SAMPLE_CSV).await;
    upload_id(&app, USER, "second.csv", SAMPLE_CSV).await;
    upload_id(&app, "bob", "other.csv", SAMPLE_CSV).await;

    let body = body_json(get(&app, "/api/v1/datasets", Some(USER)).await).await;
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"][0]["filename"], "second.csv");
    assert_eq!(body["data"][1]["filename"], "first.csv");
}

#[tokio::test]
async fn test_list_datasets_empty() {
    let app = test_app();
    let response = get(&app, "/api/v1/datasets", Some("nobody")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([]));
}

#[tokio::test]
async fn test_retention_keeps_five_newest() {
    let app = test_app();
    let mut ids = Vec::new();
    for n in 0..6 {
        let body = body_json(upload(&app, USER, &format!("upload-{n}.csv"), SAMPLE_CSV).await).await;
        ids.push(body["data"]["dataset"]["id"].as_str().unwrap().to_string());
        if n == 5 {
            assert_eq!(body["data"]["evicted"], json!([ids[0]]));
        }
    }

    let body = body_json(get(&app, "/api/v1/datasets", Some(USER)).await).await;
    let listed: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["filename"].as_str().unwrap())
        .collect();
    assert_eq!(
        listed,
        vec!["upload-5.csv", "upload-4.csv", "upload-3.csv", "upload-2.csv", "upload-1.csv"]
    );

    let response = get(&app, &format!("/api/v1/datasets/{}", ids[0]), Some(USER)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_dataset_with_records() {
    let app = test_app();
    let id = upload_id(&app, USER, "pumps.csv", SAMPLE_CSV).await;

    let body = body_json(get(&app, &format!("/api/v1/datasets/{id}"), Some(USER)).await).await;
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["records"][1]["name"], "Valve-1");
    assert_eq!(body["data"]["records"][1]["equipment_type"], "Valve");
}

#[tokio::test]
async fn test_other_users_dataset_is_not_found() {
    let app = test_app();
    let id = upload_id(&app, USER, "pumps.csv", SAMPLE_CSV).await;

    let response = get(&app, &format!("/api/v1/datasets/{id}"), Some("mallory")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_id_is_not_found() {
    let app = test_app();
    let response = get(&app, "/api/v1/datasets/12345/raw", Some(USER)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_then_distribution_exact_values() {
    let app = test_app();
    let csv = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
Pump A,Pump,10,20,30
Valve B,Valve,5,15,25
Pump C,Pump,20,25,35
";
    let response = upload(&app, USER, "plant.csv", csv).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let dataset = &body["data"]["dataset"];
    assert_eq!(dataset["total_count"], 3);
    let avg_flowrate = dataset["avg_flowrate"].as_f64().unwrap();
    assert!((avg_flowrate - 35.0 / 3.0).abs() < 1e-9);
    assert_eq!(format!("{avg_flowrate:.2}"), "11.67");
    assert_eq!(dataset["avg_pressure"], 20.0);
    assert_eq!(dataset["avg_temperature"], 30.0);

    let id = dataset["id"].as_str().unwrap();
    let uri = format!("/api/v1/datasets/{id}/type-distribution");
    let body = body_json(get(&app, &uri, Some(USER)).await).await;
    assert_eq!(
        body["data"]["distribution"],
        json!([
            {"equipment_type": "Pump", "count": 2, "equipment_names": ["Pump A", "Pump C"]},
            {"equipment_type": "Valve", "count": 1, "equipment_names": ["Valve B"]}
        ])
    );
}

#[tokio::test]
async fn test_type_distribution() {
    let app = test_app();
    let id = upload_id(&app, USER, "pumps.csv", SAMPLE_CSV).await;

    let uri = format!("/api/v1/datasets/{id}/type-distribution");
    let body = body_json(get(&app, &uri, Some(USER)).await).await;
    assert_eq!(body["data"]["dataset_id"], id.as_str());
    assert_eq!(
        body["data"]["distribution"],
        json!([
            {"equipment_type": "Pump", "count": 2, "equipment_names": ["Pump-1", "Pump-2"]},
            {"equipment_type": "Valve", "count": 1, "equipment_names": ["Valve-1"]}
        ])
    );
}

#[tokio::test]
async fn test_raw_columns() {
    let app = test_app();
    let id = upload_id(&app, USER, "pumps.csv", SAMPLE_CSV).await;

    let body = body_json(get(&app, &format!("/api/v1/datasets/{id}/raw"), Some(USER)).await).await;
    assert_eq!(body["data"]["names"], json!(["Pump-1", "Valve-1", "Pump-2"]));
    assert_eq!(body["data"]["flowrates"], json!([10.0, 20.0, 30.0]));
}

#[tokio::test]
async fn test_charts() {
    let app = test_app();
    let id = upload_id(&app, USER, "pumps.csv", SAMPLE_CSV).await;

    let body = body_json(get(&app, &format!("/api/v1/datasets/{id}/charts"), Some(USER)).await).await;
    let charts = &body["data"];
    assert_eq!(charts["type_distribution"]["status"], "ready");
    assert_eq!(charts["temperature_histogram"]["status"], "ready");
    assert_eq!(
        charts["type_distribution"]["chart"]["title"],
        "Equipment Type Distribution"
    );
}

#[tokio::test]
async fn test_charts_for_empty_dataset() {
    let app = test_app();
    let id = upload_id(&app, USER, "empty.csv", HEADER_ONLY_CSV).await;

    let body = body_json(get(&app, &format!("/api/v1/datasets/{id}/charts"), Some(USER)).await).await;
    assert_eq!(body["data"]["flowrate_pressure"]["status"], "placeholder");
    assert_eq!(
        body["data"]["flowrate_pressure"]["chart"]["message"],
        "No data to show"
    );
}

#[tokio::test]
async fn test_equipment_chart() {
    let app = test_app();
    let id = upload_id(&app, USER, "pumps.csv", SAMPLE_CSV).await;

    let uri = format!("/api/v1/datasets/{id}/charts/equipment");
    let body = body_json(get(&app, &uri, Some(USER)).await).await;
    assert_eq!(body["data"]["status"], "ready");
    assert_eq!(
        body["data"]["chart"]["categories"],
        json!(["Pump-1", "Valve-1", "Pump-2"])
    );
}

#[tokio::test]
async fn test_report_download() {
    let app = test_app();
    let id = upload_id(&app, USER, "pumps.csv", SAMPLE_CSV).await;

    let response = get(&app, &format!("/api/v1/datasets/{id}/report"), Some(USER)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains(&format!("report_{id}.pdf")));

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_report_for_empty_dataset() {
    let app = test_app();
    let id = upload_id(&app, USER, "empty.csv", HEADER_ONLY_CSV).await;

    let response = get(&app, &format!("/api/v1/datasets/{id}/report"), Some(USER)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "NO_EQUIPMENT_DATA");
}

#[tokio::test]
async fn test_delete_dataset() {
    let app = test_app();
    let id = upload_id(&app, USER, "pumps.csv", SAMPLE_CSV).await;

    let response = delete(&app, &format!("/api/v1/datasets/{id}"), "mallory").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(&app, &format!("/api/v1/datasets/{id}"), USER).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!({"id": id.as_str(), "deleted": true}));

    let response = get(&app, &format!("/api/v1/datasets/{id}"), Some(USER)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile() {
    let app = test_app();
    upload_id(&app, USER, "a.csv", SAMPLE_CSV).await;
    let newest = upload_id(&app, USER, "b.csv", SAMPLE_CSV).await;

    let body = body_json(get(&app, "/api/v1/profile", Some(USER)).await).await;
    assert_eq!(body["data"]["user_id"], USER);
    assert_eq!(body["data"]["total_datasets"], 2);
    assert_eq!(body["data"]["datasets"][0]["id"], newest.as_str());
    assert_eq!(body["data"]["datasets"][0]["filename"], "b.csv");
}
