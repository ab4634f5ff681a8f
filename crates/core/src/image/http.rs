//! HTTP image generation backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{ImageError, ImageGenerator, ImageRef, ImageRequest};

/// Settings for [`HttpImageGenerator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGeneratorConfig {
    /// Endpoint receiving the JSON `ImageRequest`.
    pub endpoint: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    120
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    images: Vec<String>,
}

/// Posts the request as JSON and reads `{"images": [...]}`.
pub struct HttpImageGenerator {
    client: Client,
    config: ImageGeneratorConfig,
}

impl HttpImageGenerator {
    pub fn new(config: ImageGeneratorConfig) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImageError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate(&self, request: ImageRequest) -> Result<ImageRef, ImageError> {
        debug!(provider = %request.provider, title = %request.title, "Requesting cover image");

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ImageError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let message = response.text().await.unwrap_or_default();
            return Err(ImageError::Api { status, message });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ImageError::InvalidResponse(e.to_string()))?;

        first_image(body)
    }
}

fn first_image(body: GenerateResponse) -> Result<ImageRef, ImageError> {
    body.images
        .into_iter()
        .find(|url| !url.is_empty())
        .map(ImageRef)
        .ok_or(ImageError::NoImage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: ImageGeneratorConfig =
            toml::from_str(r#"endpoint = "http://localhost:9000/generate""#).unwrap();
        assert_eq!(config.timeout_secs, 120);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_first_image() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"images": ["", "https://cdn.example/cover.png"]}"#).unwrap();
        assert_eq!(
            first_image(body).unwrap(),
            ImageRef("https://cdn.example/cover.png".to_string())
        );

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(first_image(empty), Err(ImageError::NoImage)));
    }

    #[test]
    fn test_request_serialization() {
        let request = ImageRequest {
            provider: "poster".to_string(),
            title: "Rust 2.0".to_string(),
            subtitle: "2024-06-15 Daily Digest".to_string(),
            prompt: "technology, Rust 2.0".to_string(),
            mode: "poster".to_string(),
            count: 1,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["provider"], "poster");
    }
}
