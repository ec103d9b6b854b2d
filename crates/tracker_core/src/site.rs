use url::Url;

/// Hostname fragments of the job boards the page agent activates on.
pub const SUPPORTED_HOSTS: [&str; 4] = ["linkedin.com", "indeed.com", "glassdoor.com", "monster.com"];

/// Lowercased hostname of `page_url`, or `None` if it has no host.
pub fn hostname_of(page_url: &str) -> Option<String> {
    Url::parse(page_url.trim())
        .ok()
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
}
