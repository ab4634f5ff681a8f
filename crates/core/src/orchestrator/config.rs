//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::scraper::SourceType;

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Items carried into enrichment and publishing when the settings
    /// provider has no usable `article_count`.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Maximum summarize calls in flight at once.
    #[serde(default = "default_batch_size")]
    pub enrich_batch_size: usize,

    /// Hard cap on the final headline, in characters.
    #[serde(default = "default_headline_max")]
    pub headline_max_chars: usize,

    /// Hard cap on the cover image title, in characters.
    #[serde(default = "default_short_title_max")]
    pub short_title_max_chars: usize,

    /// Joins titles for headline generation and splits the headline
    /// for the cover title.
    #[serde(default = "default_separator")]
    pub title_separator: String,

    #[serde(default = "default_campaign_label")]
    pub campaign_label: String,

    /// chrono format string for the date prefix.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Source types scraped, in order. Each needs a registered scraper.
    #[serde(default = "default_source_types")]
    pub source_types: Vec<SourceType>,

    /// Image generator to use for the cover.
    #[serde(default = "default_cover_provider")]
    pub cover_provider: String,

    #[serde(default = "default_cover_mode")]
    pub cover_mode: String,

    /// Fixed keywords prepended to the cover prompt.
    #[serde(default = "default_cover_keywords")]
    pub cover_prompt_keywords: String,
}

fn default_top_n() -> usize {
    10
}

fn default_batch_size() -> usize {
    10
}

fn default_headline_max() -> usize {
    64
}

fn default_short_title_max() -> usize {
    30
}

fn default_separator() -> String {
    " | ".to_string()
}

fn default_campaign_label() -> String {
    "Daily Digest".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_source_types() -> Vec<SourceType> {
    SourceType::ALL.to_vec()
}

fn default_cover_provider() -> String {
    "poster".to_string()
}

fn default_cover_mode() -> String {
    "poster".to_string()
}

fn default_cover_keywords() -> String {
    "technology, news, minimalist, bold typography".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            enrich_batch_size: default_batch_size(),
            headline_max_chars: default_headline_max(),
            short_title_max_chars: default_short_title_max(),
            title_separator: default_separator(),
            campaign_label: default_campaign_label(),
            date_format: default_date_format(),
            source_types: default_source_types(),
            cover_provider: default_cover_provider(),
            cover_mode: default_cover_mode(),
            cover_prompt_keywords: default_cover_keywords(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.enrich_batch_size, 10);
        assert_eq!(config.headline_max_chars, 64);
        assert_eq!(config.short_title_max_chars, 30);
        assert_eq!(config.title_separator, " | ");
        assert_eq!(
            config.source_types,
            vec![SourceType::Crawler, SourceType::SocialFeed]
        );
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: PipelineConfig = toml::from_str("top_n = 3").unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.enrich_batch_size, 10);
        assert_eq!(config.cover_provider, "poster");
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            top_n = 5
            enrich_batch_size = 4
            headline_max_chars = 48
            short_title_max_chars = 20
            title_separator = " / "
            campaign_label = "Weekly Roundup"
            date_format = "%d.%m.%Y"
            source_types = ["social_feed"]
            cover_provider = "banner"
            cover_mode = "wide"
            cover_prompt_keywords = "retro, neon"
        "#;
        let config: PipelineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.enrich_batch_size, 4);
        assert_eq!(config.title_separator, " / ");
        assert_eq!(config.source_types, vec![SourceType::SocialFeed]);
        assert_eq!(config.cover_mode, "wide");
    }
}
