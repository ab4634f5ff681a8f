//! Scrape stage: sequential fetch over every configured source.

use tracing::{debug, info, warn};

use crate::config::SourceLists;
use crate::content::ScrapedContent;
use crate::metrics;
use crate::notify::NotificationDispatcher;
use crate::scraper::{ScraperRegistry, SourceType};

use super::types::{PipelineError, RunStats, ScrapeOutput, StageOutcome};

impl ScrapeOutput {
    /// Split into the counters and the stage outcome. No items halts the run.
    pub fn into_outcome(self) -> (RunStats, StageOutcome<Vec<ScrapedContent>>) {
        let outcome = if self.items.is_empty() {
            StageOutcome::Halt {
                reason: format!(
                    "no content scraped from {} sources ({} failed)",
                    self.stats.sources(),
                    self.stats.failed
                ),
            }
        } else {
            StageOutcome::Complete(self.items)
        };
        (self.stats, outcome)
    }
}

/// Scrape every source of every type in `types`, one call at a time.
///
/// A failing source is counted, logged and reported, then skipped. Only a
/// type without a bound scraper aborts the stage.
pub(crate) async fn scrape_all(
    registry: &ScraperRegistry,
    types: &[SourceType],
    sources: &SourceLists,
    notifications: &NotificationDispatcher,
) -> Result<ScrapeOutput, PipelineError> {
    let mut output = ScrapeOutput::default();

    for ignored in SourceType::ALL.iter().filter(|t| !types.contains(*t)) {
        let count = sources.get(*ignored).len();
        if count > 0 {
            warn!(
                source_type = %ignored,
                sources = count,
                "Source type is not enabled, skipping its sources"
            );
        }
    }

    for &source_type in types {
        let scraper = registry
            .get(source_type)
            .ok_or(PipelineError::MissingScraper(source_type))?;

        for source in sources.get(source_type) {
            debug!(source_type = %source_type, source = %source, scraper = scraper.name(), "Scraping");

            match scraper.scrape(source).await {
                Ok(items) => {
                    info!(
                        source_type = %source_type,
                        source = %source,
                        items = items.len(),
                        "Scraped source"
                    );
                    metrics::SCRAPE_SOURCES
                        .with_label_values(&[source_type.as_str(), "success"])
                        .inc();
                    metrics::SCRAPED_ITEMS
                        .with_label_values(&[source_type.as_str()])
                        .inc_by(items.len() as u64);
                    output.stats.success += 1;
                    output.stats.contents += items.len();
                    output.items.extend(items);
                }
                Err(e) => {
                    warn!(
                        source_type = %source_type,
                        source = %source,
                        error = %e,
                        "Failed to scrape source"
                    );
                    metrics::SCRAPE_SOURCES
                        .with_label_values(&[source_type.as_str(), "failed"])
                        .inc();
                    output.stats.failed += 1;
                    notifications
                        .warning(
                            "Scrape failed",
                            &format!("{} source {} failed: {}", source_type, source, e),
                        )
                        .await;
                }
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::notify::NotifyLevel;
    use crate::scraper::ScrapeError;
    use crate::testing::{fixtures, MockNotifier, MockScraper};

    fn lists(crawler: &[&str], social: &[&str]) -> SourceLists {
        SourceLists {
            crawler: crawler.iter().map(|s| s.to_string()).collect(),
            social_feed: social.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_every_source_is_attempted() {
        let crawler = MockScraper::new();
        let social = MockScraper::new();
        crawler.set_items("c1", fixtures::items("c1", 2)).await;
        crawler.set_items("c2", fixtures::items("c2", 1)).await;
        social.set_items("s1", fixtures::items("s1", 3)).await;

        let registry = ScraperRegistry::new()
            .with(SourceType::Crawler, Arc::new(crawler.clone()))
            .with(SourceType::SocialFeed, Arc::new(social.clone()));
        let notifier = MockNotifier::new();
        let dispatcher = NotificationDispatcher::new(Arc::new(notifier.clone()));

        let output = scrape_all(
            &registry,
            &SourceType::ALL,
            &lists(&["c1", "c2"], &["s1"]),
            &dispatcher,
        )
        .await
        .unwrap();

        assert_eq!(crawler.calls().await, vec!["c1", "c2"]);
        assert_eq!(social.calls().await, vec!["s1"]);
        assert_eq!(output.stats.success, 3);
        assert_eq!(output.stats.failed, 0);
        assert_eq!(output.stats.contents, 6);
        assert_eq!(output.items.len(), 6);
        assert!(notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_failing_source_is_isolated() {
        let crawler = MockScraper::new();
        crawler.set_items("c1", fixtures::items("c1", 2)).await;
        crawler
            .set_error("bad", ScrapeError::Http("timed out".to_string()))
            .await;
        crawler.set_items("c3", fixtures::items("c3", 1)).await;

        let registry = ScraperRegistry::new()
            .with(SourceType::Crawler, Arc::new(crawler.clone()))
            .with(SourceType::SocialFeed, Arc::new(MockScraper::new()));
        let notifier = MockNotifier::new();
        let dispatcher = NotificationDispatcher::new(Arc::new(notifier.clone()));

        let output = scrape_all(
            &registry,
            &SourceType::ALL,
            &lists(&["c1", "bad", "c3"], &[]),
            &dispatcher,
        )
        .await
        .unwrap();

        assert_eq!(crawler.calls().await, vec!["c1", "bad", "c3"]);
        assert_eq!(output.stats.success, 2);
        assert_eq!(output.stats.failed, 1);
        assert_eq!(output.items.len(), 3);
        assert!(output.items.iter().all(|i| !i.id.starts_with("bad")));

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].level, NotifyLevel::Warning);
        assert!(sent[0].body.contains("crawler"));
        assert!(sent[0].body.contains("bad"));
        assert!(sent[0].body.contains("timed out"));
    }

    #[tokio::test]
    async fn test_missing_scraper_is_fatal() {
        let registry =
            ScraperRegistry::new().with(SourceType::Crawler, Arc::new(MockScraper::new()));
        let dispatcher = NotificationDispatcher::new(Arc::new(MockNotifier::new()));

        let result = scrape_all(
            &registry,
            &SourceType::ALL,
            &lists(&[], &["s1"]),
            &dispatcher,
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::MissingScraper(SourceType::SocialFeed))
        ));
    }

    #[tokio::test]
    async fn test_disabled_type_is_not_scraped() {
        let social = MockScraper::new();
        let registry = ScraperRegistry::new()
            .with(SourceType::Crawler, Arc::new(MockScraper::new()))
            .with(SourceType::SocialFeed, Arc::new(social.clone()));
        let dispatcher = NotificationDispatcher::new(Arc::new(MockNotifier::new()));

        let output = scrape_all(
            &registry,
            &[SourceType::Crawler],
            &lists(&["c1"], &["s1"]),
            &dispatcher,
        )
        .await
        .unwrap();

        assert!(social.calls().await.is_empty());
        assert_eq!(output.stats.sources(), 1);
    }

    #[test]
    fn test_empty_output_halts() {
        let output = ScrapeOutput {
            items: vec![],
            stats: RunStats {
                success: 1,
                failed: 2,
                contents: 0,
            },
        };
        let (stats, outcome) = output.into_outcome();
        assert_eq!(stats.failed, 2);
        assert!(matches!(outcome, StageOutcome::Halt { .. }));
    }
}
