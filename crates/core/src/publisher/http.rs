//! Generic REST publishing target.
//!
//! - `POST {api_base}/media` with `{"url": ...}` → `{"media_id": ...}`
//! - `POST {api_base}/articles` with a [`PublishRequest`] → [`PublishResult`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::traits::Publisher;
use super::types::{MediaHandle, PublishError, PublishRequest, PublishResult};
use crate::image::ImageRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    pub api_base: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    60
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    media_id: Option<String>,
}

pub struct HttpPublisher {
    client: Client,
    config: PublisherConfig,
}

impl HttpPublisher {
    pub fn new(config: PublisherConfig) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PublishError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, PublishError> {
        let builder = match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| PublishError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let message = response.text().await.unwrap_or_default();
            return Err(PublishError::Api { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| PublishError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    fn name(&self) -> &str {
        "http"
    }

    async fn upload_image(&self, image: &ImageRef) -> Result<MediaHandle, PublishError> {
        debug!(image = %image, "Uploading cover image");
        let builder = self
            .client
            .post(self.url("media"))
            .json(&UploadRequest { url: image.as_str() });

        let body: UploadResponse = self.send_json(builder).await?;
        body.media_id
            .filter(|id| !id.is_empty())
            .map(MediaHandle)
            .ok_or_else(|| PublishError::UploadRejected(image.to_string()))
    }

    async fn publish(&self, request: PublishRequest) -> Result<PublishResult, PublishError> {
        debug!(title = %request.title, bytes = request.content.len(), "Publishing document");
        let builder = self.client.post(self.url("articles")).json(&request);
        self.send_json(builder).await
    }
}
