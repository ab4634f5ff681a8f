//! Publisher trait.

use async_trait::async_trait;

use super::types::{MediaHandle, PublishError, PublishRequest, PublishResult};
use crate::image::ImageRef;

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Name of this publisher for logging.
    fn name(&self) -> &str;

    /// Upload an image and return its handle on the target.
    async fn upload_image(&self, image: &ImageRef) -> Result<MediaHandle, PublishError>;

    /// Submit a rendered document.
    async fn publish(&self, request: PublishRequest) -> Result<PublishResult, PublishError>;
}
