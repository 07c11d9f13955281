//! Best-effort page title extraction for untitled links.
//!
//! When a link is created without a title, the target page is fetched and
//! its `<title>` element extracted. Any failure (network, non-HTML body,
//! missing element, timeout) yields `None`; link creation never waits on
//! more than the probe timeout and never fails because of it.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// Maximum stored title length, matching the column width.
const MAX_TITLE_LENGTH: usize = 255;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Fetches the `<title>` of a target page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TitleProber: Send + Sync {
    /// Returns the page title, or `None` on any failure.
    async fn probe_title(&self, url: &str) -> Option<String>;
}

/// HTTP prober fetching the target page over reqwest.
pub struct HttpTitleProber {
    client: reqwest::Client,
}

impl HttpTitleProber {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl TitleProber for HttpTitleProber {
    async fn probe_title(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                debug!("Title probe for {url} returned {}", r.status());
                return None;
            }
            Err(e) => {
                debug!("Title probe for {url} failed: {e}");
                return None;
            }
        };

        let body = response.text().await.ok()?;
        extract_title(&body)
    }
}

/// Prober used when enrichment is disabled; always returns `None`.
pub struct NullTitleProber;

#[async_trait]
impl TitleProber for NullTitleProber {
    async fn probe_title(&self, _url: &str) -> Option<String> {
        None
    }
}

/// Pulls the first `<title>` element out of an HTML document.
fn extract_title(html: &str) -> Option<String> {
    let captured = TITLE_RE.captures(html)?.get(1)?.as_str();
    let title: String = captured.split_whitespace().collect::<Vec<_>>().join(" ");

    if title.is_empty() {
        return None;
    }

    Some(title.chars().take(MAX_TITLE_LENGTH).collect())
}
