//! Conversation scenarios implementation
//!
//! This module defines the multi-step conversations the bot drives:
//! checkout and the admin product flows.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::utils::errors::{BazarBotError, Result};
use crate::utils::helpers::is_valid_phone;
use super::context::ConversationContext;

/// Represents a conversation scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Initial step when starting this scenario
    pub initial_step: String,
    /// All possible steps in this scenario
    pub steps: HashMap<String, ScenarioStep>,
    /// Maximum duration for this scenario (in seconds)
    pub max_duration: Option<u64>,
}

/// Represents a step within a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Step identifier
    pub id: String,
    /// Possible next steps from this step
    pub next_steps: Vec<String>,
    /// Whether this step expects user input
    pub requires_input: bool,
    /// Validation rules for user input
    pub validation: Option<StepValidation>,
}

/// Validation rules for a scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepValidation {
    /// Input type expected
    pub input_type: InputType,
    /// Minimum length (for text inputs)
    pub min_length: Option<usize>,
    /// Maximum length (for text inputs)
    pub max_length: Option<usize>,
    /// Custom validation message
    pub error_message: Option<String>,
}

/// Types of input expected in a step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputType {
    Text,
    Number,
    Phone,
    Url,
    Choice(Vec<String>),
}

/// Scenario manager for handling all conversation scenarios
#[derive(Debug, Clone)]
pub struct ScenarioManager {
    scenarios: HashMap<String, Scenario>,
}

impl ScenarioManager {
    /// Create a new scenario manager with default scenarios
    pub fn new() -> Self {
        let mut manager = Self {
            scenarios: HashMap::new(),
        };

        manager.register_default_scenarios();
        manager
    }

    /// Register all default scenarios
    fn register_default_scenarios(&mut self) {
        self.register_scenario(create_checkout_scenario());
        self.register_scenario(create_add_product_scenario());
        self.register_scenario(create_edit_product_scenario());
        self.register_scenario(create_add_category_scenario());
    }

    /// Register a new scenario
    pub fn register_scenario(&mut self, scenario: Scenario) {
        self.scenarios.insert(scenario.id.clone(), scenario);
    }

    /// Get a scenario by ID
    pub fn get_scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.get(id)
    }

    /// Start a scenario for a user
    pub fn start_scenario(&self, context: &mut ConversationContext, scenario_id: &str) -> Result<()> {
        let scenario = self.get_scenario(scenario_id)
            .ok_or_else(|| BazarBotError::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        context.start_scenario(scenario_id, &scenario.initial_step)?;

        // Set scenario-specific expiry if defined
        if let Some(max_duration) = scenario.max_duration {
            let expiry = chrono::Utc::now() + chrono::Duration::seconds(max_duration as i64);
            context.set_expiry(expiry);
        }

        Ok(())
    }

    /// Move to the next step in a scenario
    pub fn next_step(&self, context: &mut ConversationContext, next_step: &str) -> Result<()> {
        let scenario_id = context.scenario.as_ref()
            .ok_or_else(|| BazarBotError::InvalidStateTransition {
                from: "no_scenario".to_string(),
                to: next_step.to_string(),
            })?;

        let scenario = self.get_scenario(scenario_id)
            .ok_or_else(|| BazarBotError::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        let current_step_id = context.step.as_ref()
            .ok_or_else(|| BazarBotError::InvalidStateTransition {
                from: "no_step".to_string(),
                to: next_step.to_string(),
            })?;

        let current_step = scenario.steps.get(current_step_id)
            .ok_or_else(|| BazarBotError::InvalidInput(format!("Unknown step: {}", current_step_id)))?;

        // Validate that the next step is allowed
        if !current_step.next_steps.contains(&next_step.to_string()) {
            return Err(BazarBotError::InvalidStateTransition {
                from: current_step_id.clone(),
                to: next_step.to_string(),
            });
        }

        // Validate that the next step exists
        if !scenario.steps.contains_key(next_step) {
            return Err(BazarBotError::InvalidInput(format!("Unknown step: {}", next_step)));
        }

        context.next_step(next_step)?;
        Ok(())
    }

    /// Validate user input for the current step
    pub fn validate_input(&self, context: &ConversationContext, input: &str) -> Result<()> {
        let scenario_id = context.scenario.as_ref()
            .ok_or_else(|| BazarBotError::InvalidInput("No active scenario".to_string()))?;

        let step_id = context.step.as_ref()
            .ok_or_else(|| BazarBotError::InvalidInput("No active step".to_string()))?;

        let scenario = self.get_scenario(scenario_id)
            .ok_or_else(|| BazarBotError::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        let step = scenario.steps.get(step_id)
            .ok_or_else(|| BazarBotError::InvalidInput(format!("Unknown step: {}", step_id)))?;

        if let Some(validation) = &step.validation {
            self.validate_input_against_rules(input, validation)?;
        }

        Ok(())
    }

    /// Validate input against validation rules
    fn validate_input_against_rules(&self, input: &str, validation: &StepValidation) -> Result<()> {
        // Check length constraints
        if let Some(min_length) = validation.min_length {
            if input.len() < min_length {
                return Err(BazarBotError::InvalidInput(
                    validation.error_message.clone()
                        .unwrap_or_else(|| format!("Input too short (minimum {} characters)", min_length))
                ));
            }
        }

        if let Some(max_length) = validation.max_length {
            if input.len() > max_length {
                return Err(BazarBotError::InvalidInput(
                    validation.error_message.clone()
                        .unwrap_or_else(|| format!("Input too long (maximum {} characters)", max_length))
                ));
            }
        }

        // Check input type specific validation
        match &validation.input_type {
            InputType::Number => {
                let digits = input.replace([' ', ','], "");
                if digits.parse::<i64>().map(|n| n <= 0).unwrap_or(true) {
                    return Err(BazarBotError::InvalidInput(
                        validation.error_message.clone()
                            .unwrap_or_else(|| "Please enter a positive number".to_string())
                    ));
                }
            }
            InputType::Phone => {
                if !is_valid_phone(input) {
                    return Err(BazarBotError::InvalidInput(
                        validation.error_message.clone()
                            .unwrap_or_else(|| "Please enter a valid phone number".to_string())
                    ));
                }
            }
            InputType::Url => {
                if url::Url::parse(input).is_err() {
                    return Err(BazarBotError::InvalidInput(
                        validation.error_message.clone()
                            .unwrap_or_else(|| "Please enter a valid URL".to_string())
                    ));
                }
            }
            InputType::Choice(choices) => {
                if !choices.contains(&input.to_string()) {
                    return Err(BazarBotError::InvalidInput(
                        format!("Invalid choice. Available options: {}", choices.join(", "))
                    ));
                }
            }
            InputType::Text => {}
        }

        Ok(())
    }

    /// Get the current step information
    pub fn get_current_step(&self, context: &ConversationContext) -> Result<&ScenarioStep> {
        let scenario_id = context.scenario.as_ref()
            .ok_or_else(|| BazarBotError::InvalidInput("No active scenario".to_string()))?;

        let step_id = context.step.as_ref()
            .ok_or_else(|| BazarBotError::InvalidInput("No active step".to_string()))?;

        let scenario = self.get_scenario(scenario_id)
            .ok_or_else(|| BazarBotError::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        scenario.steps.get(step_id)
            .ok_or_else(|| BazarBotError::InvalidInput(format!("Unknown step: {}", step_id)))
    }
}

/// Checkout: collect contact details, then confirm the order
fn create_checkout_scenario() -> Scenario {
    let mut steps = HashMap::new();

    steps.insert("name_input".to_string(), ScenarioStep {
        id: "name_input".to_string(),
        next_steps: vec!["phone_input".to_string()],
        requires_input: true,
        validation: Some(StepValidation {
            input_type: InputType::Text,
            min_length: Some(2),
            max_length: Some(100),
            error_message: Some("Name should be 2-100 characters".to_string()),
        }),
    });

    steps.insert("phone_input".to_string(), ScenarioStep {
        id: "phone_input".to_string(),
        next_steps: vec!["address_input".to_string()],
        requires_input: true,
        validation: Some(StepValidation {
            input_type: InputType::Phone,
            min_length: None,
            max_length: Some(20),
            error_message: Some("Please enter a valid phone number".to_string()),
        }),
    });

    steps.insert("address_input".to_string(), ScenarioStep {
        id: "address_input".to_string(),
        next_steps: vec!["confirmation".to_string()],
        requires_input: true,
        validation: Some(StepValidation {
            input_type: InputType::Text,
            min_length: Some(5),
            max_length: Some(255),
            error_message: Some("Address should be 5-255 characters".to_string()),
        }),
    });

    steps.insert("confirmation".to_string(), ScenarioStep {
        id: "confirmation".to_string(),
        next_steps: vec![],
        requires_input: true,
        validation: Some(StepValidation {
            input_type: InputType::Choice(vec!["confirm".to_string(), "cancel".to_string()]),
            min_length: None,
            max_length: None,
            error_message: Some("Please confirm or cancel".to_string()),
        }),
    });

    Scenario {
        id: "checkout".to_string(),
        name: "Checkout".to_string(),
        initial_step: "name_input".to_string(),
        steps,
        max_duration: Some(1800), // 30 minutes
    }
}

/// Admin flow: create a new product step by step
fn create_add_product_scenario() -> Scenario {
    let mut steps = HashMap::new();

    steps.insert("name_input".to_string(), ScenarioStep {
        id: "name_input".to_string(),
        next_steps: vec!["price_input".to_string()],
        requires_input: true,
        validation: Some(StepValidation {
            input_type: InputType::Text,
            min_length: Some(2),
            max_length: Some(100),
            error_message: Some("Product name should be 2-100 characters".to_string()),
        }),
    });

    steps.insert("price_input".to_string(), ScenarioStep {
        id: "price_input".to_string(),
        next_steps: vec!["description_input".to_string()],
        requires_input: true,
        validation: Some(StepValidation {
            input_type: InputType::Number,
            min_length: None,
            max_length: None,
            error_message: Some("Price must be a positive number".to_string()),
        }),
    });

    steps.insert("description_input".to_string(), ScenarioStep {
        id: "description_input".to_string(),
        next_steps: vec!["image_input".to_string()],
        requires_input: true,
        validation: Some(StepValidation {
            input_type: InputType::Text,
            min_length: None,
            max_length: Some(1000),
            error_message: Some("Description is limited to 1000 characters".to_string()),
        }),
    });

    steps.insert("image_input".to_string(), ScenarioStep {
        id: "image_input".to_string(),
        next_steps: vec!["category_input".to_string()],
        requires_input: true,
        validation: Some(StepValidation {
            input_type: InputType::Url,
            min_length: None,
            max_length: Some(255),
            error_message: Some("Please send a valid image URL".to_string()),
        }),
    });

    steps.insert("category_input".to_string(), ScenarioStep {
        id: "category_input".to_string(),
        next_steps: vec!["confirmation".to_string()],
        requires_input: true,
        validation: None,
    });

    steps.insert("confirmation".to_string(), ScenarioStep {
        id: "confirmation".to_string(),
        next_steps: vec![],
        requires_input: true,
        validation: Some(StepValidation {
            input_type: InputType::Choice(vec!["confirm".to_string(), "cancel".to_string()]),
            min_length: None,
            max_length: None,
            error_message: Some("Please confirm or cancel".to_string()),
        }),
    });

    Scenario {
        id: "add_product".to_string(),
        name: "Add Product".to_string(),
        initial_step: "name_input".to_string(),
        steps,
        max_duration: Some(1800), // 30 minutes
    }
}

/// Admin flow: edit a single product field. The field and product id are
/// carried in the context data, input arrives in one step.
fn create_edit_product_scenario() -> Scenario {
    let mut steps = HashMap::new();

    steps.insert("value_input".to_string(), ScenarioStep {
        id: "value_input".to_string(),
        next_steps: vec![],
        requires_input: true,
        validation: None,
    });

    Scenario {
        id: "edit_product".to_string(),
        name: "Edit Product".to_string(),
        initial_step: "value_input".to_string(),
        steps,
        max_duration: Some(900), // 15 minutes
    }
}

/// Admin flow: create a category from a single name message
fn create_add_category_scenario() -> Scenario {
    let mut steps = HashMap::new();

    steps.insert("name_input".to_string(), ScenarioStep {
        id: "name_input".to_string(),
        next_steps: vec![],
        requires_input: true,
        validation: Some(StepValidation {
            input_type: InputType::Text,
            min_length: Some(2),
            max_length: Some(100),
            error_message: Some("Category name should be 2-100 characters".to_string()),
        }),
    });

    Scenario {
        id: "add_category".to_string(),
        name: "Add Category".to_string(),
        initial_step: "name_input".to_string(),
        steps,
        max_duration: Some(900), // 15 minutes
    }
}

impl Default for ScenarioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_creation() {
        let manager = ScenarioManager::new();

        assert!(manager.get_scenario("checkout").is_some());
        assert!(manager.get_scenario("add_product").is_some());
        assert!(manager.get_scenario("edit_product").is_some());
        assert!(manager.get_scenario("add_category").is_some());
        assert!(manager.get_scenario("nonexistent").is_none());
    }

    #[test]
    fn test_checkout_flow() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(123);

        manager.start_scenario(&mut context, "checkout").unwrap();
        assert_eq!(context.scenario, Some("checkout".to_string()));
        assert_eq!(context.step, Some("name_input".to_string()));

        manager.next_step(&mut context, "phone_input").unwrap();
        manager.next_step(&mut context, "address_input").unwrap();
        manager.next_step(&mut context, "confirmation").unwrap();
        assert_eq!(context.step, Some("confirmation".to_string()));
    }

    #[test]
    fn test_phone_validation() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(123);

        manager.start_scenario(&mut context, "checkout").unwrap();
        manager.next_step(&mut context, "phone_input").unwrap();

        assert!(manager.validate_input(&context, "+998 90 123 45 67").is_ok());
        assert!(manager.validate_input(&context, "not a phone").is_err());
    }

    #[test]
    fn test_price_validation() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(123);

        manager.start_scenario(&mut context, "add_product").unwrap();
        manager.next_step(&mut context, "price_input").unwrap();

        assert!(manager.validate_input(&context, "150 000").is_ok());
        assert!(manager.validate_input(&context, "0").is_err());
        assert!(manager.validate_input(&context, "cheap").is_err());
    }

    #[test]
    fn test_invalid_transitions() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(123);

        manager.start_scenario(&mut context, "checkout").unwrap();

        // Skipping ahead is rejected
        assert!(manager.next_step(&mut context, "confirmation").is_err());
        // Unknown steps are rejected
        assert!(manager.next_step(&mut context, "nonexistent").is_err());
    }
}
