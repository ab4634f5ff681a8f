//! LLM-backed ranker and summarizer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::llm::{complete_json, CompletionRequest, LlmClient};
use super::traits::{AiError, Ranker, Summarizer};
use crate::content::{RankResult, ScrapedContent, Summary};

const RANK_SYSTEM: &str = "You are the editor of a daily technology digest. \
Score each article for newsworthiness and relevance to the readers on a scale \
from 0 to 100. Respond with JSON only.";

const SUMMARIZE_SYSTEM: &str = "You are a technical copy editor. Rewrite the article \
into a concise, accurate summary for a newsletter. Respond with JSON only.";

const TITLE_SYSTEM: &str = "You write headlines for a daily technology digest. \
Respond with the headline only, on a single line, without quotes.";

/// Article excerpt sent to the ranker.
#[derive(Debug, Serialize)]
struct RankInput<'a> {
    id: &'a str,
    title: &'a str,
    excerpt: String,
}

#[derive(Debug, Deserialize)]
struct RankOutput {
    id: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    title: String,
    content: String,
    #[serde(default)]
    keywords: Vec<String>,
}

/// [`Ranker`] and [`Summarizer`] over an [`LlmClient`].
pub struct LlmAnalyst {
    client: Arc<dyn LlmClient>,
    /// Separator the generated headline should use between stories.
    separator: String,
    /// Body characters sent per article when ranking.
    excerpt_chars: usize,
}

impl LlmAnalyst {
    pub fn new(client: Arc<dyn LlmClient>, separator: impl Into<String>) -> Self {
        Self {
            client,
            separator: separator.into(),
            excerpt_chars: 300,
        }
    }

    pub fn with_excerpt_chars(mut self, excerpt_chars: usize) -> Self {
        self.excerpt_chars = excerpt_chars;
        self
    }

    fn rank_prompt(&self, items: &[ScrapedContent]) -> Result<String, AiError> {
        let inputs: Vec<RankInput<'_>> = items
            .iter()
            .map(|item| RankInput {
                id: &item.id,
                title: &item.title,
                excerpt: item.content.chars().take(self.excerpt_chars).collect(),
            })
            .collect();
        let articles =
            serde_json::to_string(&inputs).map_err(|e| AiError::Other(e.to_string()))?;

        Ok(format!(
            "Articles:\n{articles}\n\n\
             Return a JSON array with one object per article: \
             [{{\"id\": \"<article id>\", \"score\": <0-100>}}]"
        ))
    }

    fn title_prompt(&self, titles: &str) -> String {
        format!(
            "Today's stories, separated by \"{sep}\":\n{titles}\n\n\
             Write one headline naming the two or three most important stories, \
             separated by \"{sep}\". Keep it under 40 characters.",
            sep = self.separator
        )
    }
}

#[async_trait]
impl Ranker for LlmAnalyst {
    async fn rank(&self, items: &[ScrapedContent]) -> Result<Vec<RankResult>, AiError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let request = CompletionRequest::new(self.rank_prompt(items)?)
            .with_system(RANK_SYSTEM)
            .with_max_tokens(4096)
            .with_temperature(0.0);
        let (scores, usage): (Vec<RankOutput>, _) =
            complete_json(self.client.as_ref(), request).await?;

        debug!(
            provider = self.client.provider(),
            scored = scores.len(),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Ranked articles"
        );

        Ok(scores
            .into_iter()
            .map(|s| RankResult::new(s.id, s.score.clamp(0.0, 100.0) / 100.0))
            .collect())
    }
}

#[async_trait]
impl Summarizer for LlmAnalyst {
    async fn summarize(&self, item: &ScrapedContent) -> Result<Summary, AiError> {
        let article = serde_json::to_string(item).map_err(|e| AiError::Other(e.to_string()))?;
        let prompt = format!(
            "Article:\n{article}\n\n\
             Return JSON: {{\"title\": \"<rewritten title>\", \
             \"content\": \"<summary, at most 200 words>\", \
             \"keywords\": [\"<3 to 5 keywords>\"]}}"
        );
        let request = CompletionRequest::new(prompt).with_system(SUMMARIZE_SYSTEM);

        let (output, _): (SummaryOutput, _) = complete_json(self.client.as_ref(), request).await?;
        if output.title.trim().is_empty() || output.content.trim().is_empty() {
            return Err(AiError::InvalidOutput(format!(
                "empty title or content for {}",
                item.id
            )));
        }

        Ok(Summary {
            title: output.title.trim().to_string(),
            content: output.content.trim().to_string(),
            keywords: output.keywords,
        })
    }

    async fn generate_title(&self, titles: &str) -> Result<String, AiError> {
        let request = CompletionRequest::new(self.title_prompt(titles))
            .with_system(TITLE_SYSTEM)
            .with_max_tokens(128);
        let response = self.client.complete(request).await?;

        let headline = response
            .text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(|line| line.trim_matches(|c| c == '"' || c == '\'').to_string())
            .unwrap_or_default();

        if headline.is_empty() {
            return Err(AiError::InvalidOutput("empty headline".to_string()));
        }
        Ok(headline)
    }
}
