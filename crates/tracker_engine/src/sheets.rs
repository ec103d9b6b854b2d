use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use tracker_core::SheetRow;
use tracker_logging::{tracker_debug, tracker_warn};
use url::Url;

use crate::{SyncContext, SyncError};

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Where a new row lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPlacement {
    /// Server-side `values:append`; the provider picks the next row.
    #[default]
    Append,
    /// Count column A, then write `A{n}:I{n}`. Not safe against a concurrent writer
    /// appending between the read and the write.
    NextEmptyRow,
}

#[derive(Debug, Clone)]
pub struct SheetsSettings {
    pub api_base: String,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SpreadsheetMetadata {
    #[serde(default)]
    pub properties: TitleProperties,
    #[serde(default)]
    pub sheets: Vec<Worksheet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Worksheet {
    #[serde(default)]
    pub properties: TitleProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TitleProperties {
    #[serde(default)]
    pub title: String,
}

impl SpreadsheetMetadata {
    pub fn title(&self) -> &str {
        &self.properties.title
    }

    pub fn first_sheet_title(&self) -> Option<&str> {
        self.sheets
            .first()
            .map(|sheet| sheet.properties.title.as_str())
    }
}

/// Outcome of a write. The range is reported by the provider when present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WriteResult {
    pub updated_range: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody {
    updated_range: Option<String>,
    updates: Option<Box<UpdateBody>>,
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[async_trait::async_trait]
pub trait SheetsClient: Send + Sync {
    /// Spreadsheet title and worksheet titles.
    async fn metadata(&self, ctx: &SyncContext) -> Result<SpreadsheetMetadata, SyncError>;

    /// Append one row after the last row of `sheet`, inserting a new row.
    async fn append_row(
        &self,
        ctx: &SyncContext,
        sheet: &str,
        row: &SheetRow,
    ) -> Result<WriteResult, SyncError>;

    /// Number of non-empty rows reported for `column` of `sheet`.
    async fn column_len(&self, ctx: &SyncContext, sheet: &str, column: &str)
        -> Result<usize, SyncError>;

    /// Overwrite `A{row_number}:I{row_number}` of `sheet`.
    async fn write_row(
        &self,
        ctx: &SyncContext,
        sheet: &str,
        row_number: usize,
        row: &SheetRow,
    ) -> Result<WriteResult, SyncError>;
}

/// A1 range for `sheet`. The name is always quoted so that sheets named like
/// cell references (`Q1`, `FY24`) are not read as ranges.
pub fn a1_range(sheet: &str, cells: Option<&str>) -> String {
    let name = format!("'{}'", sheet.replace('\'', "''"));
    match cells {
        Some(cells) => format!("{name}!{cells}"),
        None => name,
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestSheetsClient {
    client: Client,
    settings: SheetsSettings,
}

impl ReqwestSheetsClient {
    pub fn new(settings: SheetsSettings) -> Result<Self, SyncError> {
        let client = Client::builder().build().map_err(SyncError::from_reqwest)?;
        Ok(Self { client, settings })
    }

    /// `{api_base}/{spreadsheet_id}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, ctx: &SyncContext, segments: &[&str]) -> Result<Url, SyncError> {
        let mut url = Url::parse(&self.settings.api_base)
            .map_err(|err| SyncError::Network(format!("invalid api base: {err}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| SyncError::Network("api base cannot be a base url".to_string()))?;
            path.pop_if_empty().push(&ctx.spreadsheet_id);
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder, ctx: &SyncContext) -> Result<String, SyncError> {
        let response = request
            .bearer_auth(ctx.token.secret())
            .send()
            .await
            .map_err(SyncError::from_reqwest)?;
        let status = response.status();
        let body = response.text().await.map_err(SyncError::from_reqwest)?;
        if !status.is_success() {
            tracker_warn!("Sheets API responded {}: {}", status, body);
            return Err(SyncError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn send_values(
        &self,
        request: RequestBuilder,
        ctx: &SyncContext,
        row: &SheetRow,
    ) -> Result<WriteResult, SyncError> {
        let payload = json!({ "values": [row.cells()] });
        let body = self
            .execute(
                request
                    .header(CONTENT_TYPE, "application/json")
                    .body(payload.to_string()),
                ctx,
            )
            .await?;
        Ok(parse_write_result(&body))
    }
}

fn parse_write_result(body: &str) -> WriteResult {
    let parsed: Option<UpdateBody> = serde_json::from_str(body).ok();
    let updated_range = parsed.and_then(|body| {
        body.updated_range
            .or_else(|| body.updates.and_then(|inner| inner.updated_range))
    });
    WriteResult { updated_range }
}

#[async_trait::async_trait]
impl SheetsClient for ReqwestSheetsClient {
    async fn metadata(&self, ctx: &SyncContext) -> Result<SpreadsheetMetadata, SyncError> {
        let mut url = self.endpoint(ctx, &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "properties.title,sheets.properties.title");
        let body = self.execute(self.client.get(url), ctx).await?;
        serde_json::from_str(&body).map_err(|err| SyncError::Decode(err.to_string()))
    }

    async fn append_row(
        &self,
        ctx: &SyncContext,
        sheet: &str,
        row: &SheetRow,
    ) -> Result<WriteResult, SyncError> {
        let target = format!("{}:append", a1_range(sheet, None));
        let mut url = self.endpoint(ctx, &["values", &target])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");
        tracker_debug!("Appending row to {}", target);
        self.send_values(self.client.post(url), ctx, row).await
    }

    async fn column_len(
        &self,
        ctx: &SyncContext,
        sheet: &str,
        column: &str,
    ) -> Result<usize, SyncError> {
        let range = a1_range(sheet, Some(&format!("{column}:{column}")));
        let url = self.endpoint(ctx, &["values", &range])?;
        let body = self.execute(self.client.get(url), ctx).await?;
        let values: ValueRange =
            serde_json::from_str(&body).map_err(|err| SyncError::Decode(err.to_string()))?;
        Ok(values.values.len())
    }

    async fn write_row(
        &self,
        ctx: &SyncContext,
        sheet: &str,
        row_number: usize,
        row: &SheetRow,
    ) -> Result<WriteResult, SyncError> {
        let range = a1_range(sheet, Some(&format!("A{row_number}:I{row_number}")));
        let mut url = self.endpoint(ctx, &["values", &range])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        tracker_debug!("Writing row {}", range);
        self.send_values(self.client.put(url), ctx, row).await
    }
}

#[cfg(test)]
mod tests {
    use super::{a1_range, parse_write_result};

    #[test]
    fn sheet_names_are_always_quoted() {
        assert_eq!(a1_range("Sheet1", Some("A:A")), "'Sheet1'!A:A");
        assert_eq!(a1_range("Sheet1", None), "'Sheet1'");
        assert_eq!(a1_range("Job Hunt", Some("A5:I5")), "'Job Hunt'!A5:I5");
    }

    #[test]
    fn cell_like_names_stay_sheet_names() {
        assert_eq!(a1_range("Q1", None), "'Q1'");
        assert_eq!(a1_range("FY24", Some("A:A")), "'FY24'!A:A");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(a1_range("Bob's", None), "'Bob''s'");
    }

    #[test]
    fn write_result_reads_nested_append_range() {
        let body = r#"{"updates":{"updatedRange":"Sheet1!A7:I7"}}"#;
        assert_eq!(
            parse_write_result(body).updated_range.as_deref(),
            Some("Sheet1!A7:I7")
        );
        let body = r#"{"updatedRange":"Sheet1!A3:I3"}"#;
        assert_eq!(
            parse_write_result(body).updated_range.as_deref(),
            Some("Sheet1!A3:I3")
        );
        assert_eq!(parse_write_result("").updated_range, None);
    }
}
