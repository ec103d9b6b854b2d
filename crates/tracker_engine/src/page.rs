use tracker_core::hostname_of;

use crate::{decode_html, DecodeError, FetchError, PageFetcher};

/// A loaded job page: where it came from and its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    url: String,
    hostname: String,
    html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("page url has no host: {0}")]
    InvalidUrl(String),
    #[error("failed to fetch page: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Result<Self, PageError> {
        let url = url.into();
        let hostname = hostname_of(&url).ok_or_else(|| PageError::InvalidUrl(url.clone()))?;
        Ok(Self {
            url,
            hostname,
            html: html.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Fetch and decode `url`. The snapshot keeps the post-redirect URL.
pub async fn load_page(fetcher: &dyn PageFetcher, url: &str) -> Result<PageSnapshot, PageError> {
    let output = fetcher.fetch(url).await?;
    let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref())?;
    PageSnapshot::new(output.metadata.final_url, decoded.html)
}
