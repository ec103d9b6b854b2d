use std::sync::Arc;

use scraper::{Html, Selector};
use tracker_core::{JobRecord, SUPPORTED_HOSTS};
use tracker_logging::tracker_debug;

use crate::PageSnapshot;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("no extraction strategy registered for {0}")]
    UnsupportedSite(String),
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Pulls a [`JobRecord`] out of one kind of job page.
pub trait ExtractionStrategy: Send + Sync {
    fn extract(&self, page: &PageSnapshot) -> JobRecord;
}

/// Site-specific extraction: one CSS selector for the title, one for the company.
#[derive(Debug, Clone)]
pub struct SelectorStrategy {
    site_label: String,
    title: Selector,
    company: Selector,
}

impl SelectorStrategy {
    /// Parses both selectors up front; a malformed one is rejected here rather
    /// than yielding placeholder fields on every page.
    pub fn new(
        site_label: impl Into<String>,
        title_selector: &str,
        company_selector: &str,
    ) -> Result<Self, ScrapeError> {
        Ok(Self {
            site_label: site_label.into(),
            title: parse_selector(title_selector)?,
            company: parse_selector(company_selector)?,
        })
    }

    pub fn linkedin() -> Result<Self, ScrapeError> {
        Self::new(
            "LinkedIn",
            ".job-details-jobs-unified-top-card__job-title",
            ".job-details-jobs-unified-top-card__company-name",
        )
    }

    pub fn indeed() -> Result<Self, ScrapeError> {
        Self::new(
            "Indeed",
            r#"[data-testid="jobsearch-JobInfoHeader-title"]"#,
            r#"[data-testid="inlineHeader-companyName"]"#,
        )
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|err| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        reason: err.to_string(),
    })
}

impl ExtractionStrategy for SelectorStrategy {
    fn extract(&self, page: &PageSnapshot) -> JobRecord {
        let doc = Html::parse_document(page.html());
        let title = first_text(&doc, &self.title);
        let company = first_text(&doc, &self.company);
        JobRecord::from_scraped(
            title.as_deref(),
            company.as_deref(),
            page.url(),
            self.site_label.as_str(),
        )
    }
}

/// Fallback for boards without dedicated selectors:
/// - title from the first `<h1>`
/// - company from the second ` - ` segment of the document `<title>`
/// - site label is the hostname.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericStrategy;

impl ExtractionStrategy for GenericStrategy {
    fn extract(&self, page: &PageSnapshot) -> JobRecord {
        let doc = Html::parse_document(page.html());
        let heading_sel = Selector::parse("h1").ok();
        let title_sel = Selector::parse("title").ok();
        let title = heading_sel.and_then(|sel| first_text(&doc, &sel));
        let document_title = title_sel
            .and_then(|sel| first_text(&doc, &sel))
            .unwrap_or_default();
        let company = document_title.split(" - ").nth(1);
        JobRecord::from_scraped(title.as_deref(), company, page.url(), page.hostname())
    }
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector).next().map(|node| {
        node.text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    })
}

struct SiteEntry {
    host_fragment: String,
    strategy: Arc<dyn ExtractionStrategy>,
}

/// Maps hostname fragments to extraction strategies.
///
/// Lookup is case-insensitive substring matching on the hostname; the first
/// registration that matches wins.
#[derive(Default)]
pub struct SiteRegistry {
    sites: Vec<SiteEntry>,
}

impl SiteRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry for the built-in job boards. Hosts without dedicated selectors
    /// get [`GenericStrategy`].
    pub fn with_defaults() -> Result<Self, ScrapeError> {
        let mut registry = Self::empty();
        registry.register("linkedin.com", Arc::new(SelectorStrategy::linkedin()?));
        registry.register("indeed.com", Arc::new(SelectorStrategy::indeed()?));
        for host in SUPPORTED_HOSTS {
            if !registry.is_supported(host) {
                registry.register(host, Arc::new(GenericStrategy));
            }
        }
        Ok(registry)
    }

    pub fn register(&mut self, host_fragment: impl Into<String>, strategy: Arc<dyn ExtractionStrategy>) {
        self.sites.push(SiteEntry {
            host_fragment: host_fragment.into().to_ascii_lowercase(),
            strategy,
        });
    }

    pub fn lookup(&self, hostname: &str) -> Option<&dyn ExtractionStrategy> {
        let hostname = hostname.to_ascii_lowercase();
        self.sites
            .iter()
            .find(|entry| hostname.contains(&entry.host_fragment))
            .map(|entry| entry.strategy.as_ref())
    }

    pub fn is_supported(&self, hostname: &str) -> bool {
        self.lookup(hostname).is_some()
    }

    pub fn extract(&self, page: &PageSnapshot) -> Result<JobRecord, ScrapeError> {
        let strategy = self
            .lookup(page.hostname())
            .ok_or_else(|| ScrapeError::UnsupportedSite(page.hostname().to_string()))?;
        let record = strategy.extract(page);
        tracker_debug!(
            "Scraped {} job '{}' at '{}'",
            record.site,
            record.title,
            record.company
        );
        Ok(record)
    }
}
