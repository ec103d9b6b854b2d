mod support;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use tracker_core::{JobData, Request, FALLBACK_SHEET_ID};
use tracker_engine::{
    handle_json, handle_request, RowPlacement, StaticTokenProvider, SyncError, SyncService,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{client, init_logging, metadata_body, service, store_with, STORED_ID};

fn job() -> JobData {
    JobData {
        title: "Engineer".to_string(),
        company: "Acme".to_string(),
        url: "http://x".to_string(),
        site: String::new(),
    }
}

async fn mount_metadata(server: &MockServer, id: &str, sheets: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_body("Job Hunt", sheets)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn save_uses_stored_sheet_over_fallback() {
    init_logging();
    let server = MockServer::start().await;
    mount_metadata(&server, STORED_ID, &["Applications"]).await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v4/spreadsheets/{STORED_ID}/values/'Applications':append"
        )))
        .and(body_json(json!({
            "values": [["10/18/2026", "Engineer", "Acme", "Applied", "", "", "http://x", "", ""]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = service(&server, store_with(Some(STORED_ID)))
        .save_job_data(job())
        .await
        .unwrap();
    assert_eq!(outcome.spreadsheet_id, STORED_ID);
    assert_eq!(outcome.sheet, "Applications");
}

#[tokio::test]
async fn cell_like_sheet_name_is_appended_to_as_a_sheet() {
    init_logging();
    let server = MockServer::start().await;
    mount_metadata(&server, STORED_ID, &["Q1", "Q2"]).await;
    Mock::given(method("POST"))
        .and(path(format!("/v4/spreadsheets/{STORED_ID}/values/'Q1':append")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = service(&server, store_with(Some(STORED_ID)))
        .save_job_data(job())
        .await
        .unwrap();
    assert_eq!(outcome.sheet, "Q1");
}

#[tokio::test]
async fn next_empty_row_quotes_cell_like_sheet_name() {
    init_logging();
    let server = MockServer::start().await;
    mount_metadata(&server, STORED_ID, &["FY24"]).await;
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{STORED_ID}/values/'FY24'!A:A")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "values": [["Date"]] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/v4/spreadsheets/{STORED_ID}/values/'FY24'!A2:I2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    service(&server, store_with(Some(STORED_ID)))
        .with_placement(RowPlacement::NextEmptyRow)
        .save_job_data(job())
        .await
        .unwrap();
}

#[tokio::test]
async fn save_without_stored_sheet_uses_fallback() {
    init_logging();
    let server = MockServer::start().await;
    mount_metadata(&server, FALLBACK_SHEET_ID, &["Sheet1"]).await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v4/spreadsheets/{FALLBACK_SHEET_ID}/values/'Sheet1':append"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = service(&server, store_with(None))
        .save_job_data(job())
        .await
        .unwrap();
    assert_eq!(outcome.spreadsheet_id, FALLBACK_SHEET_ID);
}

#[tokio::test]
async fn explicit_sheet_id_wins_for_connection_test() {
    init_logging();
    let server = MockServer::start().await;
    let explicit = "ExplicitSheet_0123456789abcdefghij";
    mount_metadata(&server, explicit, &["Sheet1"]).await;

    let info = service(&server, store_with(Some(STORED_ID)))
        .test_connection(Some(explicit))
        .await
        .unwrap();
    assert_eq!(info.spreadsheet_id, explicit);
    assert_eq!(info.title, "Job Hunt");
}

#[tokio::test]
async fn configured_fallback_replaces_built_in_one() {
    init_logging();
    let server = MockServer::start().await;
    let fallback = "TeamFallbackSheet_0123456789abcdef";
    mount_metadata(&server, fallback, &["Sheet1"]).await;

    let service = service(&server, store_with(None)).with_fallback_sheet_id(fallback);
    assert_eq!(service.resolve_spreadsheet_id(Some("   ")), fallback);
    let info = service.test_connection(None).await.unwrap();
    assert_eq!(info.spreadsheet_id, fallback);
}

#[tokio::test]
async fn connection_test_never_writes() {
    init_logging();
    let server = MockServer::start().await;
    mount_metadata(&server, STORED_ID, &["Sheet1"]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = handle_request(
        &service(&server, store_with(Some(STORED_ID))),
        Request::TestConnection { sheet_id: None },
    )
    .await;
    assert!(response.success);
    assert_eq!(response.title.as_deref(), Some("Job Hunt"));
}

#[tokio::test]
async fn next_empty_row_reads_column_then_writes_below() {
    init_logging();
    let server = MockServer::start().await;
    mount_metadata(&server, STORED_ID, &["Sheet1"]).await;
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{STORED_ID}/values/'Sheet1'!A:A")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["Date"], ["8/17/2025"]]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/v4/spreadsheets/{STORED_ID}/values/'Sheet1'!A3:I3")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updatedRange": "Sheet1!A3:I3"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = service(&server, store_with(Some(STORED_ID)))
        .with_placement(RowPlacement::NextEmptyRow)
        .save_job_data(job())
        .await
        .unwrap();
    assert_eq!(outcome.updated_range.as_deref(), Some("Sheet1!A3:I3"));
}

#[tokio::test]
async fn provider_error_becomes_failure_response() {
    init_logging();
    let server = MockServer::start().await;
    mount_metadata(&server, STORED_ID, &["Sheet1"]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let response = handle_request(
        &service(&server, store_with(Some(STORED_ID))),
        Request::SaveJobData { job_data: job() },
    )
    .await;
    assert!(!response.success);
    let error = response.error.unwrap();
    assert!(!error.is_empty());
    assert!(error.contains("500"));
    assert!(error.contains("backend exploded"));
}

#[tokio::test]
async fn metadata_error_stops_before_writing() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Requested entity was not found."))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = service(&server, store_with(Some(STORED_ID)))
        .save_job_data(job())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Http { status: 404, .. }));
}

#[tokio::test]
async fn spreadsheet_without_worksheets_fails() {
    init_logging();
    let server = MockServer::start().await;
    mount_metadata(&server, STORED_ID, &[]).await;

    let err = service(&server, store_with(Some(STORED_ID)))
        .save_job_data(job())
        .await
        .unwrap_err();
    assert_eq!(err, SyncError::NoWorksheet);
}

#[tokio::test]
async fn blank_token_is_an_auth_failure() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = SyncService::new(
        Arc::new(client(&server)),
        Arc::new(StaticTokenProvider::new("   ")),
        store_with(None),
    );
    let response = handle_request(&service, Request::TestConnection { sheet_id: None }).await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("No token received"));
}

#[tokio::test]
async fn malformed_json_gets_failure_reply() {
    init_logging();
    let server = MockServer::start().await;
    let reply = handle_json(&service(&server, store_with(None)), "{\"action\":").await;
    let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(value["success"], json!(false));
    assert!(value["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn json_round_trip_for_test_connection() {
    init_logging();
    let server = MockServer::start().await;
    mount_metadata(&server, STORED_ID, &["Sheet1"]).await;

    let reply = handle_json(
        &service(&server, store_with(None)),
        &json!({"action": "testConnection", "sheetId": STORED_ID}).to_string(),
    )
    .await;
    let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(value, json!({"success": true, "title": "Job Hunt"}));
}
