use crate::JobRecord;

/// Status written for every newly tracked job.
pub const APPLIED_STATUS: &str = "Applied";
/// Role cell used when the record carries no title.
pub const UNKNOWN_ROLE: &str = "Unknown Role";

/// The fixed 9-column projection written to the spreadsheet.
///
/// Column order matches the target sheet layout and never changes:
/// Date, Role, Company, Status, Location, Cover Letter, URL, Contact, Email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    cells: [String; SheetRow::WIDTH],
}

impl SheetRow {
    pub const WIDTH: usize = 9;

    pub const COLUMNS: [&'static str; SheetRow::WIDTH] = [
        "Date",
        "Role",
        "Company",
        "Application Status",
        "Location",
        "Cover Letter",
        "App URL",
        "Internal Contact",
        "Email",
    ];

    /// Projects a record into a row. `date` is already formatted for the sheet.
    pub fn from_record(record: &JobRecord, date: impl Into<String>) -> Self {
        Self {
            cells: [
                date.into(),
                or_default(&record.title, UNKNOWN_ROLE),
                or_default(&record.company, crate::UNKNOWN_COMPANY),
                APPLIED_STATUS.to_string(),
                String::new(),
                String::new(),
                record.url.clone(),
                String::new(),
                String::new(),
            ],
        }
    }

    pub fn cells(&self) -> &[String; SheetRow::WIDTH] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<String> {
        self.cells.into()
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
