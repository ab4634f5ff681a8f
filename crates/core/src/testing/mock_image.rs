//! Mock image generator for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::image::{ImageError, ImageGenerator, ImageRef, ImageRequest};

/// Mock implementation of the ImageGenerator trait.
///
/// Records every request and answers with a fixed image reference.
#[derive(Debug, Clone)]
pub struct MockImageGenerator {
    image: Arc<RwLock<ImageRef>>,
    requests: Arc<RwLock<Vec<ImageRequest>>>,
    /// If set, the next generate call will fail with this error.
    next_error: Arc<RwLock<Option<ImageError>>>,
}

impl Default for MockImageGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockImageGenerator {
    pub fn new() -> Self {
        Self {
            image: Arc::new(RwLock::new(ImageRef(
                "https://images.example/cover.png".to_string(),
            ))),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_image(&self, image: &str) {
        *self.image.write().await = ImageRef(image.to_string());
    }

    /// Configure the next generate call to fail with the given error.
    pub async fn set_next_error(&self, error: ImageError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get recorded requests.
    pub async fn requests(&self) -> Vec<ImageRequest> {
        self.requests.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(&self, request: ImageRequest) -> Result<ImageRef, ImageError> {
        self.requests.write().await.push(request);

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self.image.read().await.clone())
    }
}
