//! Error types for scrapers.

use thiserror::Error;

/// Errors a scraper can report for one source.
#[derive(Debug, Clone, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("source returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to parse source payload: {0}")]
    Parse(String),

    #[error("invalid source identifier: {0}")]
    InvalidSource(String),
}
