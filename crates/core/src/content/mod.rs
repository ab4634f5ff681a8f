//! Content records flowing through the pipeline.
//!
//! `ScrapedContent` is produced by scrapers and carried through every stage.
//! `RankResult` and `Summary` are collaborator outputs joined back into it,
//! and `PublishRecord` is the read-only view handed to the renderer.

mod types;

pub use types::{
    ContentMetadata, MediaAttachment, MediaKind, PublishRecord, RankResult, ScrapedContent,
    Summary,
};
