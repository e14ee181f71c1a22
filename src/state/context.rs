//! Conversation context management
//!
//! This module handles user conversation context, tracking current scenarios,
//! steps, and associated data for each user's interaction with the bot.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};

use crate::utils::errors::{BazarBotError, Result};

/// User conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Telegram user ID this context belongs to
    pub user_id: i64,
    /// Current scenario the user is in
    pub scenario: Option<String>,
    /// Current step within the scenario
    pub step: Option<String>,
    /// Scenario-specific data
    pub data: HashMap<String, serde_json::Value>,
    /// When this context expires (for cleanup)
    pub expires_at: Option<DateTime<Utc>>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Create a new conversation context for a user
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            scenario: None,
            step: None,
            data: HashMap::new(),
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Start a new scenario
    pub fn start_scenario(&mut self, scenario: &str, initial_step: &str) -> Result<()> {
        self.scenario = Some(scenario.to_string());
        self.step = Some(initial_step.to_string());
        self.data.clear();
        self.updated_at = Utc::now();
        self.expires_at = Some(Utc::now() + Duration::hours(24)); // Default 24h expiry
        Ok(())
    }

    /// Move to the next step in the current scenario
    pub fn next_step(&mut self, step: &str) -> Result<()> {
        if self.scenario.is_none() {
            return Err(BazarBotError::InvalidStateTransition {
                from: "no_scenario".to_string(),
                to: step.to_string(),
            });
        }

        self.step = Some(step.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Complete the current scenario and clear context
    pub fn complete_scenario(&mut self) {
        self.scenario = None;
        self.step = None;
        self.data.clear();
        self.expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Cancel the current scenario
    pub fn cancel_scenario(&mut self) {
        self.complete_scenario();
    }

    /// Set data for the current context
    pub fn set_data<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.data.insert(key.to_string(), json_value);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Get data from the current context
    pub fn get_data<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        if let Some(value) = self.data.get(key) {
            let result: T = serde_json::from_value(value.clone())?;
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }

    /// Get string data (convenience method)
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_data::<String>(key).unwrap_or(None)
    }

    /// Get integer data (convenience method)
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_data::<i64>(key).unwrap_or(None)
    }

    /// Remove data from context
    pub fn remove_data(&mut self, key: &str) -> Option<serde_json::Value> {
        self.updated_at = Utc::now();
        self.data.remove(key)
    }

    /// Check if context has expired
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Utc::now() > expires_at
        } else {
            false
        }
    }

    /// Set custom expiry time
    pub fn set_expiry(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }

    /// Check if user is in a specific scenario
    pub fn is_in_scenario(&self, scenario: &str) -> bool {
        self.scenario.as_ref().map_or(false, |s| s == scenario)
    }

    /// Check if user is at a specific step
    pub fn is_at_step(&self, step: &str) -> bool {
        self.step.as_ref().map_or(false, |s| s == step)
    }

    /// Check if user is in a specific scenario and step
    pub fn is_at(&self, scenario: &str, step: &str) -> bool {
        self.is_in_scenario(scenario) && self.is_at_step(step)
    }

    /// Get current scenario and step as tuple
    pub fn current_state(&self) -> (Option<&str>, Option<&str>) {
        (self.scenario.as_deref(), self.step.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context() {
        let context = ConversationContext::new(123);
        assert_eq!(context.user_id, 123);
        assert!(context.scenario.is_none());
        assert!(context.step.is_none());
        assert!(context.data.is_empty());
        assert!(context.expires_at.is_none());
    }

    #[test]
    fn test_start_scenario() {
        let mut context = ConversationContext::new(123);
        context.start_scenario("checkout", "name_input").unwrap();

        assert_eq!(context.scenario, Some("checkout".to_string()));
        assert_eq!(context.step, Some("name_input".to_string()));
        assert!(context.expires_at.is_some());
    }

    #[test]
    fn test_data_operations() {
        let mut context = ConversationContext::new(123);

        context.set_data("name", "Alisher").unwrap();
        context.set_data("product_id", 42i64).unwrap();

        assert_eq!(context.get_string("name"), Some("Alisher".to_string()));
        assert_eq!(context.get_i64("product_id"), Some(42));
        assert_eq!(context.get_string("nonexistent"), None);

        context.remove_data("product_id");
        assert_eq!(context.get_i64("product_id"), None);
    }

    #[test]
    fn test_scenario_checks() {
        let mut context = ConversationContext::new(123);
        context.start_scenario("checkout", "name_input").unwrap();

        assert!(context.is_in_scenario("checkout"));
        assert!(!context.is_in_scenario("add_product"));
        assert!(context.is_at("checkout", "name_input"));
        assert!(!context.is_at("checkout", "phone_input"));
    }

    #[test]
    fn test_expiry() {
        let mut context = ConversationContext::new(123);

        context.set_expiry(Utc::now() - Duration::hours(1));
        assert!(context.is_expired());

        context.set_expiry(Utc::now() + Duration::hours(1));
        assert!(!context.is_expired());
    }

    #[test]
    fn test_next_step_without_scenario_fails() {
        let mut context = ConversationContext::new(123);
        assert!(context.next_step("anywhere").is_err());
    }
}
