//! Scraper trait and source types.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::ScrapeError;
use crate::content::ScrapedContent;

/// A category of content origin with its own source list and scraper.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Crawled web pages and site feeds.
    Crawler,
    /// Social media accounts.
    SocialFeed,
}

impl SourceType {
    pub const ALL: [SourceType; 2] = [SourceType::Crawler, SourceType::SocialFeed];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Crawler => "crawler",
            SourceType::SocialFeed => "social_feed",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetches content items from one source identifier.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Name of this scraper for logging.
    fn name(&self) -> &str;

    /// Scrape a single source (URL, handle, ...).
    async fn scrape(&self, source: &str) -> Result<Vec<ScrapedContent>, ScrapeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_serde_names() {
        let json = serde_json::to_string(&SourceType::SocialFeed).unwrap();
        assert_eq!(json, "\"social_feed\"");

        let parsed: SourceType = serde_json::from_str("\"crawler\"").unwrap();
        assert_eq!(parsed, SourceType::Crawler);
    }

    #[test]
    fn test_source_type_display_matches_serde() {
        for source_type in SourceType::ALL {
            let json = serde_json::to_string(&source_type).unwrap();
            assert_eq!(json.trim_matches('"'), source_type.to_string());
        }
    }
}
