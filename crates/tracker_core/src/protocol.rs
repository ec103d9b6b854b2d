use serde::{Deserialize, Serialize};

use crate::JobRecord;

/// Job fields as they travel inside a `saveJobData` message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobData {
    pub title: String,
    pub company: String,
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub site: String,
}

impl From<JobRecord> for JobData {
    fn from(record: JobRecord) -> Self {
        Self {
            title: record.title,
            company: record.company,
            url: record.url,
            site: record.site,
        }
    }
}

impl From<JobData> for JobRecord {
    fn from(data: JobData) -> Self {
        Self {
            title: data.title,
            company: data.company,
            url: data.url,
            site: data.site,
        }
    }
}

/// Inbound messages accepted by the sync service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "saveJobData")]
    SaveJobData {
        #[serde(rename = "jobData")]
        job_data: JobData,
    },
    #[serde(rename = "testConnection")]
    TestConnection {
        #[serde(rename = "sheetId", default, skip_serializing_if = "Option::is_none")]
        sheet_id: Option<String>,
    },
}

impl Request {
    pub fn action(&self) -> &'static str {
        match self {
            Request::SaveJobData { .. } => "saveJobData",
            Request::TestConnection { .. } => "testConnection",
        }
    }
}

/// Reply to any [`Request`]. `error` is set, and non-empty, exactly when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn ok_with_title(title: impl Into<String>) -> Self {
        Self {
            success: true,
            title: Some(title.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        };
        Self {
            success: false,
            title: None,
            error: Some(message),
        }
    }
}
