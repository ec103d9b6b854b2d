#![allow(dead_code)]

use std::sync::{Arc, Once};

use chrono::NaiveDate;
use tracker_core::Settings;
use tracker_engine::{
    MemorySettingsStore, ReqwestSheetsClient, SettingsStore, SheetsSettings, StaticTokenProvider,
    SyncService,
};
use wiremock::MockServer;

pub const STORED_ID: &str = "StoredSheetId_0123456789abcdefghijklmnop";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tracker_logging::initialize_for_tests);
}

pub fn api_base(server: &MockServer) -> String {
    format!("{}/v4/spreadsheets", server.uri())
}

pub fn client(server: &MockServer) -> ReqwestSheetsClient {
    ReqwestSheetsClient::new(SheetsSettings {
        api_base: api_base(server),
    })
    .expect("client")
}

pub fn store_with(sheet_id: Option<&str>) -> Arc<dyn SettingsStore> {
    Arc::new(MemorySettingsStore::new(Settings {
        sheet_id: sheet_id.map(ToOwned::to_owned),
    }))
}

pub fn service(server: &MockServer, store: Arc<dyn SettingsStore>) -> SyncService {
    SyncService::new(
        Arc::new(client(server)),
        Arc::new(StaticTokenProvider::new("test-token")),
        store,
    )
    .with_clock(|| NaiveDate::from_ymd_opt(2026, 10, 18).expect("date"))
}

pub fn metadata_body(title: &str, sheets: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "properties": { "title": title },
        "sheets": sheets
            .iter()
            .map(|name| serde_json::json!({ "properties": { "title": name } }))
            .collect::<Vec<_>>(),
    })
}
