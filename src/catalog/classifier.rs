//! Hashtag to category classifier
//!
//! Maps the hashtags of a parsed post onto a single category label using
//! the configured hashtag table. Deterministic, no side effects.

use std::collections::HashMap;

use crate::config::CatalogConfig;

/// Classifies posts into categories by first hashtag match
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    table: HashMap<String, String>,
    fallback: String,
}

impl CategoryClassifier {
    pub fn new(table: HashMap<String, String>, fallback: impl Into<String>) -> Self {
        Self {
            table,
            fallback: fallback.into(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            config.hashtag_categories.clone(),
            config.fallback_category.clone(),
        )
    }

    /// Category label for a set of hashtags. The first tag (in order of
    /// appearance in the post) present in the table wins; unknown tags
    /// fall through to the fallback category.
    pub fn classify(&self, hashtags: &[String]) -> String {
        hashtags
            .iter()
            .find_map(|tag| self.table.get(tag))
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Whether at least one hashtag is a recognized category signal
    pub fn recognizes(&self, hashtags: &[String]) -> bool {
        hashtags.iter().any(|tag| self.table.contains_key(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> CategoryClassifier {
        let mut table = HashMap::new();
        table.insert("shoes".to_string(), "Footwear".to_string());
        table.insert("kurtka".to_string(), "Kurtkalar".to_string());
        CategoryClassifier::new(table, "Other")
    }

    #[test]
    fn test_first_match_wins() {
        let c = classifier();
        let tags = vec!["sale".to_string(), "shoes".to_string(), "kurtka".to_string()];
        assert_eq!(c.classify(&tags), "Footwear");
    }

    #[test]
    fn test_fallback_when_no_match() {
        let c = classifier();
        let tags = vec!["sale".to_string(), "yangi".to_string()];
        assert_eq!(c.classify(&tags), "Other");
        assert!(!c.recognizes(&tags));
    }

    #[test]
    fn test_no_hashtags_falls_back() {
        let c = classifier();
        assert_eq!(c.classify(&[]), "Other");
    }
}
