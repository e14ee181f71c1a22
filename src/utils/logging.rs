//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the BazarBot application.

use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "bazarbot.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log customer actions with structured data
pub fn log_customer_action(telegram_id: i64, action: &str, details: Option<&str>) {
    info!(
        telegram_id = telegram_id,
        action = action,
        details = details,
        "Customer action performed"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log catalog pipeline results for a channel post
pub fn log_catalog_ingest(channel_id: i64, message_id: i32, category: &str, inserted: bool) {
    if inserted {
        info!(
            channel_id = channel_id,
            message_id = message_id,
            category = category,
            "Channel post added to catalog"
        );
    } else {
        debug!(
            channel_id = channel_id,
            message_id = message_id,
            "Channel post already in catalog, skipped"
        );
    }
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        tracing::error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
