use async_trait::async_trait;

use crate::domain::{DomainError, ScrapeOptions, ScrapedPage};

#[async_trait]
pub trait PageScraper: Send + Sync {
    async fn scrape(&self, url: &str, options: ScrapeOptions) -> Result<ScrapedPage, DomainError>;
}
