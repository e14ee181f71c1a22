//! BazarBot Telegram shop bots
//!
//! A small online-shop bot suite: a shop-management bot with an admin
//! panel, cart and orders, and a channel-mirror bot that turns channel
//! posts into a categorized, self-expiring catalog.

#![allow(non_snake_case)]

pub mod catalog;
pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{BazarBotError, Result};

// Re-export main components for easy access
pub use catalog::{CatalogPruner, CategoryClassifier, PostParser};
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use state::{ScenarioManager, StateStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
