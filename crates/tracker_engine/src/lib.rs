//! Tracker engine: page scraping, Sheets sync workflow and the background request loop.
mod agent;
mod auth;
mod decode;
mod dispatch;
mod engine;
mod error;
mod fetch;
mod page;
mod persist;
mod scrape;
mod service;
mod settings;
mod sheets;
mod types;

pub use agent::{Messenger, PageAgent, PageSurface};
pub use auth::{AuthToken, CommandTokenProvider, StaticTokenProvider, TokenProvider};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use dispatch::{handle_json, handle_request};
pub use engine::{EngineEvent, EngineHandle, RequestId};
pub use error::SyncError;
pub use fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
pub use page::{load_page, PageError, PageSnapshot};
pub use persist::{ensure_parent_dir, write_atomically, PersistError};
pub use scrape::{ExtractionStrategy, GenericStrategy, ScrapeError, SelectorStrategy, SiteRegistry};
pub use service::{format_sheet_date, ConnectionInfo, SaveOutcome, SyncContext, SyncService};
pub use settings::{MemorySettingsStore, RonSettingsStore, SettingsPanel, SettingsStore};
pub use sheets::{
    a1_range, ReqwestSheetsClient, RowPlacement, SheetsClient, SheetsSettings,
    SpreadsheetMetadata, WriteResult,
};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
