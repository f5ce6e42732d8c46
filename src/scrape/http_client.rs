//! HTTP client for listing-page fetches.

use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, REFERER,
    UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;
use tracing::debug;

/// Browser-like user agent; the site serves a bot-check page to unknown
/// clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP client with browser-like headers and a mandatory post-fetch delay.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    request_delay: Duration,
}

impl HttpClient {
    /// Create a new client. The referer is pinned to the site's base origin.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        request_delay: Duration,
    ) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ru-RU,ru;q=0.5"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        if let Ok(referer) = HeaderValue::from_str(base_url) {
            headers.insert(REFERER, referer);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            request_delay,
        })
    }

    /// Fetch a page as text. Non-2xx statuses are errors. Sleeps for the
    /// configured delay after every request, successful or not.
    pub async fn get_text(&self, url: &str) -> Result<String, reqwest::Error> {
        let result = self.fetch(url).await;
        tokio::time::sleep(self.request_delay).await;
        result
    }

    async fn fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}
