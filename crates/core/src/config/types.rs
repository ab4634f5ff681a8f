use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::provider::{ConfigProvider, SourceLists, SourceProvider};
use crate::image::ImageGeneratorConfig;
use crate::notify::WebhookNotifierConfig;
use crate::orchestrator::PipelineConfig;
use crate::publisher::PublisherConfig;
use crate::scraper::FeedScraperConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Free-form runtime settings (see [`ConfigProvider`]).
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub sources: SourceLists,
    #[serde(default)]
    pub scraper: FeedScraperConfig,
    pub llm: LlmConfig,
    pub image: ImageGeneratorConfig,
    pub publisher: PublisherConfig,
    /// Webhook notifications; log-only when absent.
    #[serde(default)]
    pub notifier: Option<WebhookNotifierConfig>,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl ConfigProvider for Config {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.settings.get(key).cloned()
    }
}

impl SourceProvider for Config {
    fn get_sources(&self) -> SourceLists {
        self.sources.clone()
    }
}

/// LLM backends
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    Anthropic,
    Ollama,
}

/// LLM configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// Required for Anthropic.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Overrides the provider's default base URL.
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_timeout() -> u64 {
    120
}

/// Metrics output
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Write Prometheus text exposition here at exit (textfile collector).
    #[serde(default)]
    pub textfile_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigProvider, SourceProvider, ARTICLE_COUNT_KEY};
    use crate::scraper::SourceType;

    const MINIMAL: &str = r#"
[llm]
provider = "ollama"
model = "llama3"

[image]
endpoint = "http://localhost:9000/generate"

[publisher]
api_base = "http://localhost:9100/api"
"#;

    #[test]
    fn test_deserialize_minimal_config() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.llm.provider, LlmProvider::Ollama);
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.pipeline.top_n, 10);
        assert!(config.notifier.is_none());
        assert!(config.metrics.textfile_path.is_none());
        assert_eq!(config.sources, SourceLists::default());
    }

    #[test]
    fn test_deserialize_missing_llm_fails() {
        let toml = r#"
[image]
endpoint = "http://localhost:9000/generate"

[publisher]
api_base = "http://localhost:9100/api"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_and_sources() {
        let toml = format!(
            r#"{MINIMAL}
[settings]
article_count = 8

[sources]
crawler = ["https://a.example/feed.json"]
social_feed = ["https://b.example/feed.json", "https://c.example/feed.json"]
"#
        );
        let config: Config = toml::from_str(&toml).unwrap();

        assert_eq!(config.get_usize(ARTICLE_COUNT_KEY), Some(8));
        let sources = config.get_sources();
        assert_eq!(sources.get(SourceType::Crawler).len(), 1);
        assert_eq!(sources.get(SourceType::SocialFeed).len(), 2);
    }

    #[test]
    fn test_notifier_section() {
        let toml = format!(
            r#"{MINIMAL}
[notifier]
webhook_url = "https://hooks.example/abc"
"#
        );
        let config: Config = toml::from_str(&toml).unwrap();
        let notifier = config.notifier.unwrap();
        assert_eq!(notifier.webhook_url, "https://hooks.example/abc");
        assert_eq!(notifier.timeout_secs, 10);
    }
}
