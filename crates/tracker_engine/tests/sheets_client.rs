mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use tracker_core::{JobRecord, SheetRow};
use tracker_engine::{AuthToken, SheetsClient, SyncContext, SyncError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{client, init_logging, metadata_body};

const ID: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

fn ctx() -> SyncContext {
    SyncContext {
        spreadsheet_id: ID.to_string(),
        token: AuthToken::new("tok").unwrap(),
    }
}

fn row() -> SheetRow {
    let record = JobRecord {
        title: "Engineer".to_string(),
        company: "Acme".to_string(),
        url: "http://x".to_string(),
        site: "LinkedIn".to_string(),
    };
    SheetRow::from_record(&record, "10/18/2026")
}

#[tokio::test]
async fn metadata_sends_bearer_and_field_mask() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{ID}")))
        .and(query_param("fields", "properties.title,sheets.properties.title"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_body("Jobs", &["Sheet1", "Archive"])))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = client(&server).metadata(&ctx()).await.unwrap();
    assert_eq!(metadata.title(), "Jobs");
    assert_eq!(metadata.first_sheet_title(), Some("Sheet1"));
}

#[tokio::test]
async fn append_posts_nine_cells_as_user_entered() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v4/spreadsheets/{ID}/values/'Sheet1':append")))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .and(query_param("insertDataOption", "INSERT_ROWS"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({
            "values": [["10/18/2026", "Engineer", "Acme", "Applied", "", "", "http://x", "", ""]]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"updates": {"updatedRange": "Sheet1!A5:I5"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).append_row(&ctx(), "Sheet1", &row()).await.unwrap();
    assert_eq!(result.updated_range.as_deref(), Some("Sheet1!A5:I5"));
}

#[tokio::test]
async fn column_len_counts_returned_rows() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{ID}/values/'Sheet1'!A:A")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "'Sheet1'!A1:A3",
            "values": [["Date"], ["8/1/2025"], ["8/2/2025"]]
        })))
        .mount(&server)
        .await;

    let len = client(&server).column_len(&ctx(), "Sheet1", "A").await.unwrap();
    assert_eq!(len, 3);
}

#[tokio::test]
async fn column_len_of_empty_sheet_is_zero() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{ID}/values/'Sheet1'!A:A")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"range": "'Sheet1'!A:A"})))
        .mount(&server)
        .await;

    let len = client(&server).column_len(&ctx(), "Sheet1", "A").await.unwrap();
    assert_eq!(len, 0);
}

#[tokio::test]
async fn write_row_puts_explicit_range() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/v4/spreadsheets/{ID}/values/'Sheet1'!A4:I4")))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"updatedRange": "Sheet1!A4:I4"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).write_row(&ctx(), "Sheet1", 4, &row()).await.unwrap();
    assert_eq!(result.updated_range.as_deref(), Some("Sheet1!A4:I4"));
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{ID}")))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .mount(&server)
        .await;

    let err = client(&server).metadata(&ctx()).await.unwrap_err();
    assert_eq!(
        err,
        SyncError::Http {
            status: 403,
            body: "permission denied".to_string()
        }
    );
    assert_eq!(err.to_string(), "Sheets API error: 403 - permission denied");
}

#[tokio::test]
async fn garbage_metadata_is_a_decode_error() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client(&server).metadata(&ctx()).await.unwrap_err();
    assert!(matches!(err, SyncError::Decode(_)));
}
