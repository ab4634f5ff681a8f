//! Runtime settings and source list providers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scraper::SourceType;

/// Settings key holding how many articles to publish.
pub const ARTICLE_COUNT_KEY: &str = "article_count";

/// Key/value settings lookup.
pub trait ConfigProvider: Send + Sync {
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Reads `key` as a positive integer.
    fn get_usize(&self, key: &str) -> Option<usize> {
        match self.get(key)? {
            serde_json::Value::Number(n) => n.as_u64().map(|n| n as usize),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|n| *n > 0)
    }
}

impl ConfigProvider for HashMap<String, serde_json::Value> {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        HashMap::get(self, key).cloned()
    }
}

/// Source identifiers per source type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceLists {
    #[serde(default)]
    pub crawler: Vec<String>,
    #[serde(default)]
    pub social_feed: Vec<String>,
}

impl SourceLists {
    pub fn get(&self, source_type: SourceType) -> &[String] {
        match source_type {
            SourceType::Crawler => &self.crawler,
            SourceType::SocialFeed => &self.social_feed,
        }
    }

    pub fn set(&mut self, source_type: SourceType, sources: Vec<String>) {
        match source_type {
            SourceType::Crawler => self.crawler = sources,
            SourceType::SocialFeed => self.social_feed = sources,
        }
    }

    /// Total number of sources over the given types.
    pub fn count(&self, types: &[SourceType]) -> usize {
        types.iter().map(|t| self.get(*t).len()).sum()
    }
}

/// Supplies the categorized source lists for a run.
pub trait SourceProvider: Send + Sync {
    fn get_sources(&self) -> SourceLists;
}

impl SourceProvider for SourceLists {
    fn get_sources(&self) -> SourceLists {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_usize() {
        let mut settings: HashMap<String, serde_json::Value> = HashMap::new();
        settings.insert("n".to_string(), json!(12));
        settings.insert("s".to_string(), json!(" 7 "));
        settings.insert("zero".to_string(), json!(0));
        settings.insert("neg".to_string(), json!(-3));
        settings.insert("text".to_string(), json!("many"));

        assert_eq!(settings.get_usize("n"), Some(12));
        assert_eq!(settings.get_usize("s"), Some(7));
        assert_eq!(settings.get_usize("zero"), None);
        assert_eq!(settings.get_usize("neg"), None);
        assert_eq!(settings.get_usize("text"), None);
        assert_eq!(settings.get_usize("missing"), None);
    }

    #[test]
    fn test_source_lists_by_type() {
        let mut lists = SourceLists::default();
        lists.set(SourceType::Crawler, vec!["a".to_string(), "b".to_string()]);
        lists.set(SourceType::SocialFeed, vec!["c".to_string()]);

        assert_eq!(lists.get(SourceType::Crawler), ["a", "b"]);
        assert_eq!(lists.count(&SourceType::ALL), 3);
        assert_eq!(lists.count(&[SourceType::SocialFeed]), 1);
    }
}
