//! State storage implementation
//!
//! This module handles persistence of conversation state using Redis,
//! including serialization, deserialization and expiration.

use redis::AsyncCommands;
use tracing::{debug, error, warn};
use crate::utils::errors::Result;
use crate::config::RedisConfig;
use super::context::ConversationContext;

/// Redis-based state storage manager
#[derive(Clone)]
pub struct StateStorage {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl StateStorage {
    /// Create a new state storage instance
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Save conversation context to Redis
    pub async fn save_context(&self, context: &ConversationContext) -> Result<()> {
        let key = self.get_context_key(context.user_id);
        debug!(user_id = context.user_id, scenario = ?context.scenario,
               step = ?context.step, "Saving context to Redis");

        let serialized = serde_json::to_string(context)?;

        let mut conn = self.connection_manager.clone();

        // Set the context with TTL
        let ttl_seconds = if let Some(expires_at) = context.expires_at {
            let now = chrono::Utc::now();
            let duration = expires_at - now;
            std::cmp::max(duration.num_seconds(), 60) as u64 // Minimum 60 seconds
        } else {
            self.config.ttl_seconds
        };

        match conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await {
            Ok(_) => {
                debug!(user_id = context.user_id, ttl_seconds = ttl_seconds, "Context saved to Redis");
                Ok(())
            }
            Err(e) => {
                error!(user_id = context.user_id, error = %e, "Failed to save context to Redis");
                Err(e.into())
            }
        }
    }

    /// Load conversation context from Redis
    pub async fn load_context(&self, user_id: i64) -> Result<Option<ConversationContext>> {
        let key = self.get_context_key(user_id);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = conn.get::<&str, Option<String>>(&key).await?;

        match serialized {
            Some(data) => {
                let context: ConversationContext = serde_json::from_str(&data)?;

                // Check if context has expired
                if context.is_expired() {
                    warn!(user_id = user_id, expires_at = ?context.expires_at, "Context has expired, removing");
                    self.delete_context(user_id).await?;
                    return Ok(None);
                }

                debug!(user_id = user_id, scenario = ?context.scenario, step = ?context.step,
                       "Context loaded from Redis");
                Ok(Some(context))
            }
            None => {
                debug!(user_id = user_id, "No context found in Redis");
                Ok(None)
            }
        }
    }

    /// Delete conversation context from Redis
    pub async fn delete_context(&self, user_id: i64) -> Result<()> {
        let key = self.get_context_key(user_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;

        if deleted > 0 {
            debug!("Deleted context for user {}", user_id);
        } else {
            debug!("No context to delete for user {}", user_id);
        }

        Ok(())
    }

    /// Check if context exists for a user
    pub async fn context_exists(&self, user_id: i64) -> Result<bool> {
        let key = self.get_context_key(user_id);
        let mut conn = self.connection_manager.clone();

        let exists: bool = conn.exists(&key).await?;
        Ok(exists)
    }

    /// Get the Redis key for a user's context
    fn get_context_key(&self, user_id: i64) -> String {
        format!("{}context:{}", self.config.prefix, user_id)
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

impl std::fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStorage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedisConfig;

    fn create_test_config() -> RedisConfig {
        RedisConfig {
            url: "redis://localhost:6379".to_string(),
            prefix: "test_bazarbot:".to_string(),
            ttl_seconds: 3600,
        }
    }

    #[tokio::test]
    async fn test_context_save_load() {
        // Requires a local Redis; skipped when unavailable
        let Ok(storage) = StateStorage::new(create_test_config()).await else {
            return;
        };

        let mut context = ConversationContext::new(123);
        context.start_scenario("checkout", "name_input").unwrap();
        context.set_data("name", "Alisher").unwrap();

        storage.save_context(&context).await.unwrap();

        let loaded = storage.load_context(123).await.unwrap().unwrap();
        assert_eq!(loaded.user_id, 123);
        assert_eq!(loaded.scenario, Some("checkout".to_string()));
        assert_eq!(loaded.get_string("name"), Some("Alisher".to_string()));

        storage.delete_context(123).await.unwrap();
        assert!(!storage.context_exists(123).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_context_not_returned() {
        let Ok(storage) = StateStorage::new(create_test_config()).await else {
            return;
        };

        let mut context = ConversationContext::new(456);
        context.start_scenario("checkout", "name_input").unwrap();
        context.set_expiry(chrono::Utc::now() - chrono::Duration::hours(1));

        storage.save_context(&context).await.unwrap();

        let loaded = storage.load_context(456).await.unwrap();
        assert!(loaded.is_none());
    }
}
