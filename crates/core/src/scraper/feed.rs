//! JSON Feed scraper.
//!
//! Treats each source identifier as the URL of a JSON Feed document
//! (<https://www.jsonfeed.org/version/1.1/>) and maps its items to
//! [`ScrapedContent`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::error::ScrapeError;
use super::traits::{Scraper, SourceType};
use crate::content::{ContentMetadata, MediaAttachment, MediaKind, ScrapedContent};

/// Settings for [`FeedScraper`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedScraperConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Keep at most this many items per source (0 = unlimited).
    #[serde(default)]
    pub max_items_per_source: usize,
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("pressroom/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FeedScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            max_items_per_source: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonFeed {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    items: Vec<JsonFeedItem>,
}

#[derive(Debug, Deserialize)]
struct JsonFeedItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content_text: Option<String>,
    #[serde(default)]
    content_html: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    date_published: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    authors: Vec<JsonFeedAuthor>,
    #[serde(default)]
    attachments: Vec<JsonFeedAttachment>,
}

#[derive(Debug, Deserialize)]
struct JsonFeedAuthor {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonFeedAttachment {
    url: String,
    #[serde(default)]
    mime_type: Option<String>,
}

/// Scraper for JSON Feed endpoints.
pub struct FeedScraper {
    client: Client,
    source_type: SourceType,
    config: FeedScraperConfig,
}

impl FeedScraper {
    pub fn new(source_type: SourceType, config: FeedScraperConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ScrapeError::Http(e.to_string()))?;

        Ok(Self {
            client,
            source_type,
            config,
        })
    }

    fn map_feed(&self, source: &str, feed: JsonFeed) -> Vec<ScrapedContent> {
        let limit = match self.config.max_items_per_source {
            0 => usize::MAX,
            n => n,
        };

        feed.items
            .into_iter()
            .filter(|item| item.url.is_some() || item.id.is_some())
            .take(limit)
            .map(|item| self.map_item(source, feed.title.as_deref(), item))
            .collect()
    }

    fn map_item(&self, source: &str, feed_title: Option<&str>, item: JsonFeedItem) -> ScrapedContent {
        let url = item.url.clone().unwrap_or_default();
        let raw_id = item.id.clone().unwrap_or_else(|| url.clone());
        let id = content_id(self.source_type, source, &raw_id);

        let content = item
            .content_text
            .or(item.summary)
            .or(item.content_html)
            .unwrap_or_default();

        let mut media: Vec<MediaAttachment> = item
            .image
            .into_iter()
            .map(|url| MediaAttachment {
                url,
                kind: MediaKind::Image,
            })
            .collect();
        media.extend(item.attachments.into_iter().map(|a| MediaAttachment {
            kind: media_kind(a.mime_type.as_deref()),
            url: a.url,
        }));

        ScrapedContent {
            id,
            title: item.title.unwrap_or_default(),
            content,
            url,
            publish_date: item.date_published.as_deref().and_then(parse_date),
            metadata: ContentMetadata {
                source: feed_title.map(str::to_string).or_else(|| Some(source.to_string())),
                author: item.authors.into_iter().find_map(|a| a.name),
                keywords: item.tags,
                extra: Default::default(),
            },
            media,
            score: 0.0,
        }
    }
}

#[async_trait]
impl Scraper for FeedScraper {
    fn name(&self) -> &str {
        "json_feed"
    }

    async fn scrape(&self, source: &str) -> Result<Vec<ScrapedContent>, ScrapeError> {
        if !source.starts_with("http://") && !source.starts_with("https://") {
            return Err(ScrapeError::InvalidSource(source.to_string()));
        }

        debug!(source_type = %self.source_type, source, "Fetching feed");

        let response = self
            .client
            .get(source)
            .send()
            .await
            .map_err(|e| ScrapeError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(ScrapeError::Status { status, message });
        }

        let feed: JsonFeed = response
            .json()
            .await
            .map_err(|e| ScrapeError::Parse(e.to_string()))?;

        Ok(self.map_feed(source, feed))
    }
}

/// Build a run-unique id: `{source_type}:{digest(source, raw_id)}`.
fn content_id(source_type: SourceType, source: &str, raw_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0u8]);
    hasher.update(raw_id.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}:{}", source_type, &digest[..16])
}

fn media_kind(mime_type: Option<&str>) -> MediaKind {
    match mime_type {
        Some(m) if m.starts_with("image/") => MediaKind::Image,
        Some(m) if m.starts_with("video/") => MediaKind::Video,
        _ => MediaKind::Other,
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}
