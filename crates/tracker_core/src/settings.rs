use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Spreadsheet used when no identifier has been stored.
pub const FALLBACK_SHEET_ID: &str = "1Rkddcxs28pRSJ3S3wC0--AueWg6_ufjQjPCePl98mPM";

pub const HELP_TEXT: &str = "To find your Google Sheets ID:

  1. Open your Google Sheet
  2. Look at the URL in your browser
  3. Copy the long ID between \"/d/\" and \"/edit\"

Example:
  https://docs.google.com/spreadsheets/d/1Rkddcxs28pRSJ3S3wC0--AueWg6_ufjQjPCePl98mPM/edit

The ID is: 1Rkddcxs28pRSJ3S3wC0--AueWg6_ufjQjPCePl98mPM";

static SHEET_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{30,50}$").expect("valid sheet id pattern"));

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sheet_id: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Please enter a Sheet ID")]
    Empty,
    #[error("Invalid Sheet ID format")]
    InvalidFormat,
    #[error("settings storage error: {0}")]
    Storage(String),
}

/// A spreadsheet identifier that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetId(String);

impl SheetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SheetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trims user input and checks it against `[A-Za-z0-9_-]{30,50}`.
pub fn validate_sheet_id(input: &str) -> Result<SheetId, SettingsError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SettingsError::Empty);
    }
    if !SHEET_ID_PATTERN.is_match(trimmed) {
        return Err(SettingsError::InvalidFormat);
    }
    Ok(SheetId(trimmed.to_string()))
}

/// Pulls the identifier out of a `.../spreadsheets/d/{id}/edit` style URL.
pub fn sheet_id_from_url(sheet_url: &str) -> Option<String> {
    let url = Url::parse(sheet_url.trim()).ok()?;
    let mut segments = url.path_segments()?;
    segments.find(|segment| *segment == "d")?;
    segments
        .next()
        .filter(|id| !id.is_empty())
        .map(ToOwned::to_owned)
}

/// Status line shown by the settings panel after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsStatus {
    Success(String),
    Error(String),
}

impl SettingsStatus {
    pub fn saved() -> Self {
        SettingsStatus::Success("Settings saved successfully!".to_string())
    }

    pub fn save_failed() -> Self {
        SettingsStatus::Error("Error saving settings".to_string())
    }

    pub fn missing_for_test() -> Self {
        SettingsStatus::Error("Please enter a Sheet ID first".to_string())
    }

    pub fn connection_ok() -> Self {
        SettingsStatus::Success("✅ Connection successful!".to_string())
    }

    pub fn connection_failed(error: Option<&str>) -> Self {
        SettingsStatus::Error(format!(
            "❌ Connection failed: {}",
            error.unwrap_or("Unknown error")
        ))
    }

    pub fn text(&self) -> &str {
        match self {
            SettingsStatus::Success(text) | SettingsStatus::Error(text) => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SettingsStatus::Success(_))
    }
}

impl From<&SettingsError> for SettingsStatus {
    fn from(err: &SettingsError) -> Self {
        SettingsStatus::Error(err.to_string())
    }
}
