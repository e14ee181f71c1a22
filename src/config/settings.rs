//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    pub admin_ids: Vec<i64>,
    /// Channel the mirror bot watches for product posts
    pub channel_id: Option<i64>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Catalog pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Days a mirrored post stays in the catalog before pruning
    pub retention_days: i64,
    /// Hours between pruning runs
    pub prune_interval_hours: u64,
    /// Hashtag (without '#') to category label table
    pub hashtag_categories: HashMap<String, String>,
    /// Category assigned when no hashtag matches
    pub fallback_category: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub max_file_size: String,
    pub max_files: u32,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("BAZARBOT"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::BazarBotError> {
        super::validation::validate_settings(self)
    }
}

fn default_hashtag_categories() -> HashMap<String, String> {
    let pairs = [
        ("koylak", "Ko'ylaklar"),
        ("shortik", "Shortiklar"),
        ("krassovka", "Krasovkalar"),
        ("sumka", "Sumkalar"),
        ("kurtka", "Kurtkalar"),
        ("shim", "Shimlar"),
        ("futbolka", "Futbolkalar"),
        ("tufli", "Tuflilar"),
        ("etik", "Etiklar"),
        ("kepka", "Kepkalar"),
    ];

    pairs
        .iter()
        .map(|(tag, category)| (tag.to_string(), category.to_string()))
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                admin_ids: vec![],
                channel_id: None,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/bazarbot".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "bazarbot:".to_string(),
                ttl_seconds: 3600,
            },
            catalog: CatalogConfig {
                retention_days: 14,
                prune_interval_hours: 24,
                hashtag_categories: default_hashtag_categories(),
                fallback_category: "Boshqalar".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/bazarbot".to_string(),
                max_file_size: "10MB".to_string(),
                max_files: 5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.catalog.retention_days, 14);
        assert_eq!(settings.catalog.prune_interval_hours, 24);
        assert_eq!(
            settings.catalog.hashtag_categories.get("krassovka"),
            Some(&"Krasovkalar".to_string())
        );
    }
}
