//! Document rendering.

mod html;

pub use html::HtmlRenderer;

use async_trait::async_trait;
use thiserror::Error;

use crate::content::PublishRecord;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to render")]
    Empty,

    #[error("render failed: {0}")]
    Failed(String),
}

/// A rendered, publishable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument(pub String);

impl RenderedDocument {
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Turns publish records into a document.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, records: &[PublishRecord]) -> Result<RenderedDocument, RenderError>;
}
