//! Traits for AI collaborators.

use async_trait::async_trait;
use thiserror::Error;

use super::llm::LlmError;
use crate::content::{RankResult, ScrapedContent, Summary};

/// Errors from ranking, summarization or title generation.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("unexpected model output: {0}")]
    InvalidOutput(String),

    #[error("{0}")]
    Other(String),
}

/// Scores a batch of content items.
#[async_trait]
pub trait Ranker: Send + Sync {
    /// Returns one result per item the ranker chose to score.
    ///
    /// Items missing from the result are treated as unscored.
    async fn rank(&self, items: &[ScrapedContent]) -> Result<Vec<RankResult>, AiError>;
}

/// Rewrites content items and produces headlines.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Rewrite title, body and keywords for a single item.
    async fn summarize(&self, item: &ScrapedContent) -> Result<Summary, AiError>;

    /// Produce one headline from a separator-joined list of titles.
    async fn generate_title(&self, titles: &str) -> Result<String, AiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AiError::InvalidOutput("missing title".to_string());
        assert_eq!(err.to_string(), "unexpected model output: missing title");

        let err = AiError::from(LlmError::NotConfigured);
        assert_eq!(err.to_string(), "LLM error: Not configured");
    }
}
