//! Mock ranker and summarizer for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::ai::{AiError, Ranker, Summarizer};
use crate::content::{RankResult, ScrapedContent, Summary};

/// Mock implementation of the Ranker trait.
///
/// Without configured scores every item gets a score derived from its
/// position, highest first. With scores set, only the listed ids are returned.
#[derive(Debug, Clone, Default)]
pub struct MockRanker {
    scores: Arc<RwLock<Option<HashMap<String, f64>>>>,
    /// If set, the next rank call will fail with this error.
    next_error: Arc<RwLock<Option<AiError>>>,
    /// Batch sizes of every rank call.
    calls: Arc<RwLock<Vec<usize>>>,
}

impl MockRanker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score only these ids.
    pub async fn set_scores(&self, scores: &[(&str, f64)]) {
        *self.scores.write().await = Some(
            scores
                .iter()
                .map(|(id, score)| (id.to_string(), *score))
                .collect(),
        );
    }

    /// Configure the next rank call to fail with the given error.
    pub async fn set_next_error(&self, error: AiError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Number of items passed to each call.
    pub async fn calls(&self) -> Vec<usize> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl Ranker for MockRanker {
    async fn rank(&self, items: &[ScrapedContent]) -> Result<Vec<RankResult>, AiError> {
        self.calls.write().await.push(items.len());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let results = match &*self.scores.read().await {
            Some(scores) => items
                .iter()
                .filter_map(|item| {
                    scores
                        .get(&item.id)
                        .map(|score| RankResult::new(item.id.clone(), *score))
                })
                .collect(),
            None => {
                let total = items.len().max(1) as f64;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| RankResult::new(item.id.clone(), 1.0 - i as f64 / total))
                    .collect()
            }
        };
        Ok(results)
    }
}

/// Mock implementation of the Summarizer trait.
///
/// Summaries are derived from the item id: title `"Summary of {id}"`, body
/// `"Summarized body of {id}"`, keywords `["summarized"]`. Tracks how many
/// summarize calls run at once so tests can check the concurrency bound.
#[derive(Debug, Clone)]
pub struct MockSummarizer {
    failing_ids: Arc<RwLock<HashSet<String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    title: Arc<RwLock<String>>,
    /// If set, the next generate_title call will fail with this error.
    next_title_error: Arc<RwLock<Option<AiError>>>,
    /// Ids passed to summarize, in call order.
    summarized: Arc<RwLock<Vec<String>>>,
    /// Inputs passed to generate_title.
    title_inputs: Arc<RwLock<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            failing_ids: Arc::new(RwLock::new(HashSet::new())),
            delay: Arc::new(RwLock::new(None)),
            title: Arc::new(RwLock::new("Generated Title".to_string())),
            next_title_error: Arc::new(RwLock::new(None)),
            summarized: Arc::new(RwLock::new(Vec::new())),
            title_inputs: Arc::new(RwLock::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make summarize fail for `id`.
    pub async fn fail_for(&self, id: &str) {
        self.failing_ids.write().await.insert(id.to_string());
    }

    /// Sleep this long inside every summarize call.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Set the title returned by generate_title.
    pub async fn set_title(&self, title: &str) {
        *self.title.write().await = title.to_string();
    }

    /// Configure the next generate_title call to fail with the given error.
    pub async fn set_next_title_error(&self, error: AiError) {
        *self.next_title_error.write().await = Some(error);
    }

    /// Number of summarize calls.
    pub async fn call_count(&self) -> usize {
        self.summarized.read().await.len()
    }

    /// Ids summarized, in call order.
    pub async fn summarized(&self) -> Vec<String> {
        self.summarized.read().await.clone()
    }

    pub async fn title_inputs(&self) -> Vec<String> {
        self.title_inputs.read().await.clone()
    }

    pub async fn title_call_count(&self) -> usize {
        self.title_inputs.read().await.len()
    }

    /// Highest number of summarize calls observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, item: &ScrapedContent) -> Result<Summary, AiError> {
        self.summarized.write().await.push(item.id.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let fail = self.failing_ids.read().await.contains(&item.id);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if fail {
            return Err(AiError::Other(format!("mock summarize failure for {}", item.id)));
        }

        Ok(Summary {
            title: format!("Summary of {}", item.id),
            content: format!("Summarized body of {}", item.id),
            keywords: vec!["summarized".to_string()],
        })
    }

    async fn generate_title(&self, titles: &str) -> Result<String, AiError> {
        self.title_inputs.write().await.push(titles.to_string());

        if let Some(error) = self.next_title_error.write().await.take() {
            return Err(error);
        }

        Ok(self.title.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_ranker_default_scores_descend() {
        let ranker = MockRanker::new();
        let results = ranker.rank(&fixtures::items("x", 4)).await.unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.windows(2).all(|w| w[0].score > w[1].score));
    }

    #[tokio::test]
    async fn test_ranker_configured_scores() {
        let ranker = MockRanker::new();
        ranker.set_scores(&[("x-0", 0.3)]).await;
        let results = ranker.rank(&fixtures::items("x", 3)).await.unwrap();
        assert_eq!(results, vec![RankResult::new("x-0", 0.3)]);
    }

    #[tokio::test]
    async fn test_summarizer_failure_and_title() {
        let summarizer = MockSummarizer::new();
        summarizer.fail_for("x-1").await;
        summarizer.set_title("Big Day").await;

        let items = fixtures::items("x", 2);
        assert!(summarizer.summarize(&items[0]).await.is_ok());
        assert!(summarizer.summarize(&items[1]).await.is_err());
        assert_eq!(summarizer.generate_title("a | b").await.unwrap(), "Big Day");
        assert_eq!(summarizer.title_inputs().await, vec!["a | b"]);
        assert_eq!(summarizer.max_in_flight(), 1);
    }
}
