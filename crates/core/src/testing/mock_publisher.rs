//! Mock publisher and renderer for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::content::PublishRecord;
use crate::image::ImageRef;
use crate::publisher::{MediaHandle, PublishError, PublishRequest, PublishResult, Publisher};
use crate::render::{RenderError, RenderedDocument, Renderer};

/// Mock implementation of the Publisher trait.
///
/// Uploads return `media-{n}` handles. Publishing returns status `"published"`
/// with id `article-{n}`. Uploads and publish requests are recorded.
#[derive(Debug, Clone, Default)]
pub struct MockPublisher {
    uploads: Arc<RwLock<Vec<ImageRef>>>,
    published: Arc<RwLock<Vec<PublishRequest>>>,
    /// If set, the next upload will fail with this error.
    next_upload_error: Arc<RwLock<Option<PublishError>>>,
    /// If set, the next publish will fail with this error.
    next_publish_error: Arc<RwLock<Option<PublishError>>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_next_upload_error(&self, error: PublishError) {
        *self.next_upload_error.write().await = Some(error);
    }

    pub async fn set_next_publish_error(&self, error: PublishError) {
        *self.next_publish_error.write().await = Some(error);
    }

    /// Images uploaded, in order.
    pub async fn uploads(&self) -> Vec<ImageRef> {
        self.uploads.read().await.clone()
    }

    /// Publish requests that succeeded.
    pub async fn published(&self) -> Vec<PublishRequest> {
        self.published.read().await.clone()
    }

    pub async fn publish_count(&self) -> usize {
        self.published.read().await.len()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    fn name(&self) -> &str {
        "mock-publisher"
    }

    async fn upload_image(&self, image: &ImageRef) -> Result<MediaHandle, PublishError> {
        if let Some(error) = self.next_upload_error.write().await.take() {
            return Err(error);
        }

        let mut uploads = self.uploads.write().await;
        uploads.push(image.clone());
        Ok(MediaHandle(format!("media-{}", uploads.len())))
    }

    async fn publish(&self, request: PublishRequest) -> Result<PublishResult, PublishError> {
        if let Some(error) = self.next_publish_error.write().await.take() {
            return Err(error);
        }

        let mut published = self.published.write().await;
        published.push(request);
        Ok(PublishResult {
            status: "published".to_string(),
            id: Some(format!("article-{}", published.len())),
        })
    }
}

/// Mock implementation of the Renderer trait.
///
/// Renders one line per record: `"{id}: {title}"`.
#[derive(Debug, Clone, Default)]
pub struct MockRenderer {
    rendered: Arc<RwLock<Vec<Vec<PublishRecord>>>>,
    /// If set, the next render will fail with this error.
    next_error: Arc<RwLock<Option<RenderError>>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_next_error(&self, error: RenderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Records passed to each render call.
    pub async fn rendered(&self) -> Vec<Vec<PublishRecord>> {
        self.rendered.read().await.clone()
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn render(&self, records: &[PublishRecord]) -> Result<RenderedDocument, RenderError> {
        self.rendered.write().await.push(records.to_vec());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let body = records
            .iter()
            .map(|r| format!("{}: {}", r.id, r.title))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(RenderedDocument(body))
    }
}
