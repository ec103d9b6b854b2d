//! Tracker core: pure data model, page-agent state machine and settings validation.
mod agent;
mod job;
mod protocol;
mod row;
mod settings;
mod site;

pub use agent::{
    update, AgentEffect, AgentMsg, AgentState, AgentTimings, ControlState, ToastKind, LABEL_ERROR,
    LABEL_IDLE, LABEL_SAVED, LABEL_TRACKING,
};
pub use job::{truncate_chars, JobRecord, MAX_FIELD_CHARS, UNKNOWN_COMPANY, UNKNOWN_TITLE};
pub use protocol::{JobData, Request, Response};
pub use row::{SheetRow, APPLIED_STATUS, UNKNOWN_ROLE};
pub use settings::{
    sheet_id_from_url, validate_sheet_id, Settings, SettingsError, SettingsStatus, SheetId,
    FALLBACK_SHEET_ID, HELP_TEXT,
};
pub use site::{hostname_of, SUPPORTED_HOSTS};
