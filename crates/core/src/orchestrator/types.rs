//! Types for the pipeline orchestrator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AiError;
use crate::content::ScrapedContent;
use crate::image::{ImageError, ImageRef};
use crate::publisher::{MediaHandle, PublishError, PublishResult};
use crate::render::RenderError;
use crate::scraper::SourceType;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A configured source type has no scraper bound to it.
    #[error("no scraper registered for source type {0}")]
    MissingScraper(SourceType),

    #[error("headline generation failed: {0}")]
    Headline(#[from] AiError),

    #[error("cover image generation failed: {0}")]
    CoverImage(#[from] ImageError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

/// Result of a stage that did not fail fatally.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    /// The stage did everything it was asked to.
    Complete(T),
    /// The stage failed and substituted a reduced value.
    Degraded { value: T, reason: String },
    /// Nothing left to do; the run ends without error.
    Halt { reason: String },
}

impl<T> StageOutcome<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, StageOutcome::Degraded { .. })
    }
}

/// Per-run source counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Sources scraped successfully.
    pub success: usize,
    /// Sources that failed.
    pub failed: usize,
    /// Items scraped across all sources.
    pub contents: usize,
}

impl RunStats {
    /// Sources attempted.
    pub fn sources(&self) -> usize {
        self.success + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Items and counters produced by the scrape stage.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutput {
    pub items: Vec<ScrapedContent>,
    pub stats: RunStats,
}

/// Progress update emitted once per enriched item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichProgress {
    pub id: String,
    /// Items finished so far, including this one.
    pub completed: usize,
    pub total: usize,
    /// False when fallbacks were applied.
    pub ok: bool,
}

/// Callback receiving enrichment progress.
pub type EnrichProgressCallback = Arc<dyn Fn(&EnrichProgress) + Send + Sync>;

/// Counts from the enrichment stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    pub enriched: usize,
    pub fallbacks: usize,
}

/// Summary of a published run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: RunStats,
    pub headline: String,
    pub cover: ImageRef,
    pub media: MediaHandle,
    pub publish: PublishResult,
    /// Items in the published document.
    pub published_items: usize,
    pub enrich: EnrichStats,
    /// Reasons of stages that degraded.
    pub degraded: Vec<String>,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Nothing was scraped; no later stage ran.
    NoContent { stats: RunStats },
    Published(Box<RunReport>),
}

impl RunOutcome {
    pub fn stats(&self) -> RunStats {
        match self {
            RunOutcome::NoContent { stats } => *stats,
            RunOutcome::Published(report) => report.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_stats() {
        let stats = RunStats {
            success: 3,
            failed: 1,
            contents: 12,
        };
        assert_eq!(stats.sources(), 4);
        assert!(stats.has_failures());
        assert!(!RunStats::default().has_failures());
    }

    #[test]
    fn test_error_display() {
        let err = PipelineError::MissingScraper(SourceType::SocialFeed);
        assert_eq!(
            err.to_string(),
            "no scraper registered for source type social_feed"
        );

        let err = PipelineError::from(ImageError::NoImage);
        assert_eq!(
            err.to_string(),
            "cover image generation failed: image generator returned no images"
        );
    }

    #[test]
    fn test_stage_outcome_degraded() {
        let outcome: StageOutcome<Vec<u8>> = StageOutcome::Degraded {
            value: vec![],
            reason: "ranker down".to_string(),
        };
        assert!(outcome.is_degraded());
        assert!(!StageOutcome::Complete(1).is_degraded());
    }
}
