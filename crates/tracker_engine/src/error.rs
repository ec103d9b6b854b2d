use tracker_core::SettingsError;

/// Failure of any step in the sync workflow.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("{0}")]
    Auth(String),
    #[error("Sheets API error: {status} - {body}")]
    Http { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected Sheets API response: {0}")]
    Decode(String),
    #[error("spreadsheet has no worksheets")]
    NoWorksheet,
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl SyncError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        SyncError::Network(err.to_string())
    }
}
