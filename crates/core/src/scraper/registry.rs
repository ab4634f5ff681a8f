//! Binding of source types to scrapers.

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::{Scraper, SourceType};

/// Tagged dispatch from [`SourceType`] to the scraper serving it.
#[derive(Clone, Default)]
pub struct ScraperRegistry {
    scrapers: HashMap<SourceType, Arc<dyn Scraper>>,
}

impl ScraperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a scraper to a source type, replacing any previous binding.
    pub fn with(mut self, source_type: SourceType, scraper: Arc<dyn Scraper>) -> Self {
        self.register(source_type, scraper);
        self
    }

    pub fn register(&mut self, source_type: SourceType, scraper: Arc<dyn Scraper>) {
        self.scrapers.insert(source_type, scraper);
    }

    pub fn get(&self, source_type: SourceType) -> Option<&Arc<dyn Scraper>> {
        self.scrapers.get(&source_type)
    }

    /// Returns the first of `types` with no scraper bound, if any.
    pub fn first_missing(&self, types: &[SourceType]) -> Option<SourceType> {
        types
            .iter()
            .copied()
            .find(|t| !self.scrapers.contains_key(t))
    }

    pub fn len(&self) -> usize {
        self.scrapers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scrapers.is_empty()
    }
}

impl std::fmt::Debug for ScraperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut bound: Vec<_> = self
            .scrapers
            .iter()
            .map(|(t, s)| format!("{}={}", t, s.name()))
            .collect();
        bound.sort();
        f.debug_struct("ScraperRegistry")
            .field("scrapers", &bound)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockScraper;

    #[test]
    fn test_first_missing() {
        let registry =
            ScraperRegistry::new().with(SourceType::Crawler, Arc::new(MockScraper::new()));

        assert_eq!(registry.first_missing(&[SourceType::Crawler]), None);
        assert_eq!(
            registry.first_missing(&[SourceType::Crawler, SourceType::SocialFeed]),
            Some(SourceType::SocialFeed)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_replaces_binding() {
        let mut registry = ScraperRegistry::new();
        registry.register(SourceType::Crawler, Arc::new(MockScraper::named("first")));
        registry.register(SourceType::Crawler, Arc::new(MockScraper::named("second")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(SourceType::Crawler).unwrap().name(), "second");
    }
}
