//! Pipeline orchestrator.
//!
//! Runs the stages of a single publishing run in order:
//! - **Scrape**: sequential, one source at a time, failures isolated per source
//! - **Rank / Filter**: scores joined onto items, sorted, cut to top N
//! - **Enrich**: concurrent summarization, bounded by the batch size
//! - **Headline / Cover / Publish**: sequential; any failure ends the run

mod config;
mod enrich;
mod headline;
mod ranking;
mod runner;
mod scrape;
mod types;

pub use config::PipelineConfig;
pub use enrich::{PROCESSING_FAILED, UNTITLED};
pub use headline::{
    compose_headline, cover_prompt, cover_subtitle, format_date, format_report, join_titles,
    short_title, truncate_chars,
};
pub use ranking::{apply_scores, filter_and_sort, resolve_top_n, sort_by_score};
pub use runner::{ContentPipeline, PipelineCollaborators};
pub use types::{
    EnrichProgress, EnrichProgressCallback, EnrichStats, PipelineError, RunOutcome, RunReport,
    RunStats, ScrapeOutput, StageOutcome,
};
