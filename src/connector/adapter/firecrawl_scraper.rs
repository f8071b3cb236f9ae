use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http_transport::{build_client, decode_response, send_error, trim_base};
use crate::application::PageScraper;
use crate::domain::{DomainError, ScrapeOptions, ScrapedPage};

pub const DEFAULT_FIRECRAWL_URL: &str = "https://api.firecrawl.dev";
const SERVICE: &str = "FirecrawlScraper";

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    #[serde(flatten)]
    options: ScrapeOptions,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    data: Option<ScrapedPage>,
    error: Option<String>,
}

/// [`PageScraper`] over the hosted Firecrawl scrape API.
pub struct FirecrawlScraper {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl FirecrawlScraper {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key: api_key.into(),
            base_url: trim_base(base_url),
        })
    }
}

#[async_trait]
impl PageScraper for FirecrawlScraper {
    async fn scrape(&self, url: &str, options: ScrapeOptions) -> Result<ScrapedPage, DomainError> {
        let endpoint = format!("{}/v1/scrape", self.base_url);
        debug!("{SERVICE}: scraping {url}");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&ScrapeRequest { url, options })
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let scraped: ScrapeResponse = decode_response(response, SERVICE).await?;
        match scraped.data {
            Some(page) if scraped.success => Ok(page),
            _ => Err(DomainError::empty_result(format!(
                "{SERVICE}: no page data for {url}: {}",
                scraped.error.as_deref().unwrap_or("unknown error")
            ))),
        }
    }
}
