//! Mock settings provider for testing.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::ConfigProvider;

/// In-memory implementation of the ConfigProvider trait.
///
/// Lookups are synchronous, so state sits behind a std lock.
#[derive(Debug, Clone, Default)]
pub struct MockSettings {
    values: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl MockSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create settings with `article_count` set.
    pub fn with_article_count(count: usize) -> Self {
        let settings = Self::new();
        settings.set(crate::config::ARTICLE_COUNT_KEY, serde_json::json!(count));
        settings
    }

    pub fn set(&self, key: &str, value: serde_json::Value) {
        self.values
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
    }

    pub fn remove(&self, key: &str) {
        self.values
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }
}

impl ConfigProvider for MockSettings {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}
