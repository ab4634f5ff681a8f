//! Mock scraper for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::content::ScrapedContent;
use crate::scraper::{ScrapeError, Scraper};

/// Mock implementation of the Scraper trait.
///
/// Returns configured items per source identifier, or an empty list for
/// unknown sources. Every call is recorded in order.
///
/// # Example
///
/// ```rust,ignore
/// use pressroom_core::testing::{MockScraper, fixtures};
///
/// let scraper = MockScraper::new();
/// scraper.set_items("https://a.example/feed.json", fixtures::items("a", 3)).await;
/// scraper.set_error("https://down.example", ScrapeError::Http("refused".into())).await;
///
/// // ...run the pipeline...
///
/// assert_eq!(scraper.calls().await.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockScraper {
    name: String,
    /// Items returned per source.
    items: Arc<RwLock<HashMap<String, Vec<ScrapedContent>>>>,
    /// Errors returned per source, on every call.
    errors: Arc<RwLock<HashMap<String, ScrapeError>>>,
    /// Sources scraped, in call order.
    calls: Arc<RwLock<Vec<String>>>,
}

impl Default for MockScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl MockScraper {
    pub fn new() -> Self {
        Self::named("mock-scraper")
    }

    /// Create a mock reporting `name` from [`Scraper::name`].
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            items: Arc::new(RwLock::new(HashMap::new())),
            errors: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the items returned for `source`.
    pub async fn set_items(&self, source: &str, items: Vec<ScrapedContent>) {
        self.items.write().await.insert(source.to_string(), items);
    }

    /// Make every scrape of `source` fail with `error`.
    pub async fn set_error(&self, source: &str, error: ScrapeError) {
        self.errors.write().await.insert(source.to_string(), error);
    }

    /// Get the sources scraped so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl Scraper for MockScraper {
    fn name(&self) -> &str {
        &self.name
    }

    async fn scrape(&self, source: &str) -> Result<Vec<ScrapedContent>, ScrapeError> {
        self.calls.write().await.push(source.to_string());

        if let Some(error) = self.errors.read().await.get(source) {
            return Err(error.clone());
        }

        Ok(self
            .items
            .read()
            .await
            .get(source)
            .cloned()
            .unwrap_or_default())
    }
}
