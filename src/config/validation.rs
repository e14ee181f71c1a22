//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{BazarBotError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_catalog_config(&settings.catalog)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(BazarBotError::Config(
            "Bot token is required".to_string()
        ));
    }

    if config.admin_ids.is_empty() {
        return Err(BazarBotError::Config(
            "At least one admin ID must be configured".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(BazarBotError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(BazarBotError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(BazarBotError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(BazarBotError::Config(
            "Redis URL is required".to_string()
        ));
    }

    Ok(())
}

/// Validate catalog configuration
fn validate_catalog_config(config: &super::CatalogConfig) -> Result<()> {
    if config.retention_days <= 0 {
        return Err(BazarBotError::Config(
            "Catalog retention must be at least one day".to_string()
        ));
    }

    if config.prune_interval_hours == 0 {
        return Err(BazarBotError::Config(
            "Prune interval must be greater than 0".to_string()
        ));
    }

    if config.fallback_category.is_empty() {
        return Err(BazarBotError::Config(
            "Fallback category is required".to_string()
        ));
    }

    for (tag, category) in &config.hashtag_categories {
        if tag.is_empty() || category.is_empty() {
            return Err(BazarBotError::Config(
                "Hashtag category entries must not be empty".to_string()
            ));
        }
        if tag.starts_with('#') {
            return Err(BazarBotError::Config(
                format!("Hashtag '{}' must be configured without the leading '#'", tag)
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(BazarBotError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(BazarBotError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "123456:TEST".to_string();
        settings.bot.admin_ids = vec![42];
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_token_rejected() {
        let mut settings = valid_settings();
        settings.bot.token = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_hashtag_with_hash_rejected() {
        let mut settings = valid_settings();
        settings
            .catalog
            .hashtag_categories
            .insert("#shoes".to_string(), "Footwear".to_string());
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_zero_retention_rejected() {
        let mut settings = valid_settings();
        settings.catalog.retention_days = 0;
        assert!(validate_settings(&settings).is_err());
    }
}
