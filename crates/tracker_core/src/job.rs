/// Placeholder used when a page yields no job title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Placeholder used when a page yields no company name.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
/// Scraped title and company are capped at this many characters.
pub const MAX_FIELD_CHARS: usize = 100;

/// One scraped job posting. Ephemeral; produced per page visit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub url: String,
    pub site: String,
}

impl JobRecord {
    /// Builds a record from raw scraped text, trimming, defaulting empty fields
    /// and truncating title/company to [`MAX_FIELD_CHARS`].
    pub fn from_scraped(
        title: Option<&str>,
        company: Option<&str>,
        url: impl Into<String>,
        site: impl Into<String>,
    ) -> Self {
        Self {
            title: clean_field(title, UNKNOWN_TITLE),
            company: clean_field(company, UNKNOWN_COMPANY),
            url: url.into(),
            site: site.into(),
        }
    }
}

fn clean_field(raw: Option<&str>, fallback: &str) -> String {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    let value = if trimmed.is_empty() { fallback } else { trimmed };
    truncate_chars(value, MAX_FIELD_CHARS).to_string()
}

/// Returns at most `max` characters of `input`, never splitting a code point.
pub fn truncate_chars(input: &str, max: usize) -> &str {
    match input.char_indices().nth(max) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}
