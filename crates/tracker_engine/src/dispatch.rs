use tracker_core::{Request, Response};
use tracker_logging::{tracker_error, tracker_info};

use crate::SyncService;

/// Runs one request to completion. Every failure becomes `success: false`.
pub async fn handle_request(service: &SyncService, request: Request) -> Response {
    let action = request.action();
    tracker_info!("Handling {}", action);
    let result = match request {
        Request::SaveJobData { job_data } => service
            .save_job_data(job_data)
            .await
            .map(|_| Response::ok()),
        Request::TestConnection { sheet_id } => service
            .test_connection(sheet_id.as_deref())
            .await
            .map(|info| Response::ok_with_title(info.title)),
    };
    result.unwrap_or_else(|err| {
        tracker_error!("{} failed: {}", action, err);
        Response::failure(err.to_string())
    })
}

/// JSON-in, JSON-out wrapper around [`handle_request`] for the stdio bridge.
pub async fn handle_json(service: &SyncService, raw: &str) -> String {
    let response = match serde_json::from_str::<Request>(raw) {
        Ok(request) => handle_request(service, request).await,
        Err(err) => {
            tracker_error!("Rejected malformed request: {}", err);
            Response::failure(format!("invalid request: {err}"))
        }
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"success":false,"error":"failed to encode response"}"#.to_string())
}
