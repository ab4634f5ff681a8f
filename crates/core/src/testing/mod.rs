//! Testing utilities and mock implementations.
//!
//! Every collaborator the pipeline talks to has a mock here, so a complete
//! run can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use pressroom_core::testing::{MockScraper, MockSummarizer, fixtures};
//!
//! let scraper = MockScraper::new();
//! scraper.set_items("https://a.example/feed.json", fixtures::items("a", 5)).await;
//!
//! let summarizer = MockSummarizer::new();
//! summarizer.fail_for("a-2").await;
//!
//! // Build PipelineCollaborators from the mocks and run...
//! ```

mod mock_ai;
mod mock_image;
mod mock_notifier;
mod mock_publisher;
mod mock_scraper;
mod mock_settings;

pub use mock_ai::{MockRanker, MockSummarizer};
pub use mock_image::MockImageGenerator;
pub use mock_notifier::MockNotifier;
pub use mock_publisher::{MockPublisher, MockRenderer};
pub use mock_scraper::MockScraper;
pub use mock_settings::MockSettings;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::config::SourceLists;
    use crate::content::ScrapedContent;

    /// Create an unscored content item with reasonable defaults.
    pub fn item(id: &str) -> ScrapedContent {
        let mut item = ScrapedContent::new(
            id,
            format!("Title {}", id),
            format!("Body of {}", id),
            format!("https://example.com/{}", id),
        );
        item.metadata.source = Some("mock-feed".to_string());
        item
    }

    /// Create `count` items with ids `{prefix}-0`, `{prefix}-1`, ...
    pub fn items(prefix: &str, count: usize) -> Vec<ScrapedContent> {
        (0..count).map(|i| item(&format!("{}-{}", prefix, i))).collect()
    }

    /// Create an item with a score already set.
    pub fn scored(id: &str, score: f64) -> ScrapedContent {
        let mut item = item(id);
        item.score = score;
        item
    }

    /// Create source lists from crawler and social feed identifiers.
    pub fn source_lists(crawler: &[&str], social_feed: &[&str]) -> SourceLists {
        SourceLists {
            crawler: crawler.iter().map(|s| s.to_string()).collect(),
            social_feed: social_feed.iter().map(|s| s.to_string()).collect(),
        }
    }
}
