//! Content record types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a media attachment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    #[default]
    Other,
}

/// A media file attached to a content item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaAttachment {
    pub url: String,
    #[serde(default)]
    pub kind: MediaKind,
}

/// Free-form metadata carried with a content item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentMetadata {
    /// Name of the feed or account the item came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Keywords; rewritten by the enrichment stage.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Scraper-specific extras.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

/// One content item from any source.
///
/// `id` is unique within a run and is the join key with [`RankResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrapedContent {
    pub id: String,
    pub title: String,
    /// Body text.
    pub content: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: ContentMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaAttachment>,
    /// 0.0 until ranking succeeds.
    #[serde(default)]
    pub score: f64,
}

impl ScrapedContent {
    /// Create an item with empty metadata and no media.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            url: url.into(),
            publish_date: None,
            metadata: ContentMetadata::default(),
            media: Vec::new(),
            score: 0.0,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.metadata.keywords
    }
}

/// Score assigned to one item by the ranker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankResult {
    pub id: String,
    pub score: f64,
}

impl RankResult {
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Rewritten title, body and keywords for one item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The fields of a content item the renderer needs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublishRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    pub url: String,
    pub publish_date: Option<DateTime<Utc>>,
    pub metadata: ContentMetadata,
    pub keywords: Vec<String>,
    pub media: Vec<MediaAttachment>,
}

impl From<&ScrapedContent> for PublishRecord {
    fn from(item: &ScrapedContent) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            content: item.content.clone(),
            url: item.url.clone(),
            publish_date: item.publish_date,
            metadata: item.metadata.clone(),
            keywords: item.metadata.keywords.clone(),
            media: item.media.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_content_is_unscored() {
        let item = ScrapedContent::new("a", "Title", "Body", "https://example.com/a");
        assert_eq!(item.score, 0.0);
        assert!(item.keywords().is_empty());
        assert!(item.media.is_empty());
    }

    #[test]
    fn test_publish_record_projection() {
        let mut item = ScrapedContent::new("a", "Title", "Body", "https://example.com/a");
        item.metadata.keywords = vec!["rust".to_string(), "async".to_string()];
        item.media.push(MediaAttachment {
            url: "https://example.com/a.png".to_string(),
            kind: MediaKind::Image,
        });
        item.score = 0.7;

        let record = PublishRecord::from(&item);
        assert_eq!(record.id, "a");
        assert_eq!(record.keywords, vec!["rust", "async"]);
        assert_eq!(record.media.len(), 1);
        assert_eq!(record.metadata, item.metadata);
    }

    #[test]
    fn test_deserialize_minimal_content() {
        let json = r#"{"id":"x","title":"T","content":"C","url":"u"}"#;
        let item: ScrapedContent = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "x");
        assert_eq!(item.score, 0.0);
        assert!(item.publish_date.is_none());
        assert_eq!(item.metadata, ContentMetadata::default());
    }

    #[test]
    fn test_media_kind_defaults_to_other() {
        let json = r#"{"url":"https://example.com/file.bin"}"#;
        let media: MediaAttachment = serde_json::from_str(json).unwrap();
        assert_eq!(media.kind, MediaKind::Other);
    }
}
