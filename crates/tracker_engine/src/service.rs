//! The save/test workflow: authenticate, resolve the worksheet, write the row.
//!
//! Every call builds its own [`SyncContext`]; nothing about the spreadsheet or the
//! token survives between calls inside the service.
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use tracker_core::{JobData, JobRecord, SheetRow, FALLBACK_SHEET_ID};
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::{AuthToken, RowPlacement, SettingsStore, SheetsClient, SyncError, TokenProvider};

/// Request-scoped target and credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncContext {
    pub spreadsheet_id: String,
    pub token: AuthToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub spreadsheet_id: String,
    pub sheet: String,
    pub row: SheetRow,
    pub updated_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub spreadsheet_id: String,
    pub title: String,
}

/// `M/D/YYYY`, no zero padding.
pub fn format_sheet_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone)]
pub struct SyncService {
    sheets: Arc<dyn SheetsClient>,
    tokens: Arc<dyn TokenProvider>,
    settings: Arc<dyn SettingsStore>,
    placement: RowPlacement,
    fallback_sheet_id: String,
    today: Clock,
}

impl SyncService {
    pub fn new(
        sheets: Arc<dyn SheetsClient>,
        tokens: Arc<dyn TokenProvider>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            sheets,
            tokens,
            settings,
            placement: RowPlacement::default(),
            fallback_sheet_id: FALLBACK_SHEET_ID.to_string(),
            today: Arc::new(|| Local::now().date_naive()),
        }
    }

    pub fn with_placement(mut self, placement: RowPlacement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_fallback_sheet_id(mut self, sheet_id: impl Into<String>) -> Self {
        self.fallback_sheet_id = sheet_id.into();
        self
    }

    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Arc::new(today);
        self
    }

    pub fn placement(&self) -> RowPlacement {
        self.placement
    }

    /// Explicit id, then the stored setting, then the built-in fallback.
    pub fn resolve_spreadsheet_id(&self, explicit: Option<&str>) -> String {
        if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
            return id.to_string();
        }
        match self.settings.load() {
            Ok(settings) => {
                if let Some(id) = settings.sheet_id.filter(|id| !id.trim().is_empty()) {
                    return id;
                }
            }
            Err(err) => {
                tracker_warn!("Could not read stored settings, using fallback sheet: {}", err);
            }
        }
        self.fallback_sheet_id.clone()
    }

    pub async fn context(&self, explicit: Option<&str>) -> Result<SyncContext, SyncError> {
        let spreadsheet_id = self.resolve_spreadsheet_id(explicit);
        let token = self.tokens.token().await?;
        Ok(SyncContext {
            spreadsheet_id,
            token,
        })
    }

    pub async fn save_job_data(&self, job: JobData) -> Result<SaveOutcome, SyncError> {
        let ctx = self.context(None).await?;
        let metadata = self.sheets.metadata(&ctx).await?;
        let sheet = metadata
            .first_sheet_title()
            .ok_or(SyncError::NoWorksheet)?
            .to_string();

        let record = JobRecord::from(job);
        let row = SheetRow::from_record(&record, format_sheet_date((self.today)()));
        tracker_debug!("Formatted row for {}: {:?}", ctx.spreadsheet_id, row.cells());

        let written = match self.placement {
            RowPlacement::Append => self.sheets.append_row(&ctx, &sheet, &row).await?,
            RowPlacement::NextEmptyRow => {
                let next_row = self.sheets.column_len(&ctx, &sheet, "A").await? + 1;
                self.sheets.write_row(&ctx, &sheet, next_row, &row).await?
            }
        };

        tracker_info!(
            "Saved '{}' at '{}' to {} ({})",
            record.title,
            record.company,
            ctx.spreadsheet_id,
            written.updated_range.as_deref().unwrap_or("range not reported")
        );
        Ok(SaveOutcome {
            spreadsheet_id: ctx.spreadsheet_id,
            sheet,
            row,
            updated_range: written.updated_range,
        })
    }

    pub async fn test_connection(&self, sheet_id: Option<&str>) -> Result<ConnectionInfo, SyncError> {
        let ctx = self.context(sheet_id).await?;
        let metadata = self.sheets.metadata(&ctx).await?;
        tracker_info!("Connection ok: {} ({})", metadata.title(), ctx.spreadsheet_id);
        Ok(ConnectionInfo {
            title: metadata.title().to_string(),
            spreadsheet_id: ctx.spreadsheet_id,
        })
    }
}
