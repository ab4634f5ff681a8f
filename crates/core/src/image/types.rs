//! Image generation types and trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("image API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("image generator returned no images")]
    NoImage,

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// A request for a generated image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRequest {
    /// Named generator, e.g. "poster".
    pub provider: String,
    pub title: String,
    pub subtitle: String,
    pub prompt: String,
    pub mode: String,
    /// Number of images requested.
    pub count: u32,
}

/// Reference to a generated image (URL or backend handle).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image and return a reference to the first result.
    async fn generate(&self, request: ImageRequest) -> Result<ImageRef, ImageError>;
}
