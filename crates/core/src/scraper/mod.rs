//! Content scraping abstraction.
//!
//! Each [`SourceType`] is served by one [`Scraper`]. The [`ScraperRegistry`]
//! binds the two and is resolved once when the pipeline is built.

mod error;
mod feed;
mod registry;
mod traits;

pub use error::ScrapeError;
pub use feed::{FeedScraper, FeedScraperConfig};
pub use registry::ScraperRegistry;
pub use traits::{Scraper, SourceType};
