//! Error handling for BazarBot
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the BazarBot application
#[derive(Error, Debug)]
pub enum BazarBotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: i64 },

    #[error("Category not found: {category_id}")]
    CategoryNotFound { category_id: i64 },

    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: i64 },

    #[error("Customer not found: {telegram_id}")]
    CustomerNotFound { telegram_id: i64 },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for BazarBot operations
pub type Result<T> = std::result::Result<T, BazarBotError>;

impl BazarBotError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            BazarBotError::Database(_) => false,
            BazarBotError::Migration(_) => false,
            BazarBotError::Telegram(_) => true,
            BazarBotError::Config(_) => false,
            BazarBotError::PermissionDenied(_) => false,
            BazarBotError::ProductNotFound { .. } => false,
            BazarBotError::CategoryNotFound { .. } => false,
            BazarBotError::OrderNotFound { .. } => false,
            BazarBotError::CustomerNotFound { .. } => false,
            BazarBotError::EmptyCart => false,
            BazarBotError::InvalidStateTransition { .. } => false,
            BazarBotError::Redis(_) => true,
            BazarBotError::Serialization(_) => false,
            BazarBotError::Io(_) => true,
            BazarBotError::UrlParse(_) => false,
            BazarBotError::InvalidInput(_) => false,
            BazarBotError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BazarBotError::Database(_) => ErrorSeverity::Critical,
            BazarBotError::Migration(_) => ErrorSeverity::Critical,
            BazarBotError::Config(_) => ErrorSeverity::Critical,
            BazarBotError::PermissionDenied(_) => ErrorSeverity::Warning,
            BazarBotError::EmptyCart => ErrorSeverity::Info,
            BazarBotError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
