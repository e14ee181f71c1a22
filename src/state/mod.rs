//! State management module
//!
//! Conversation contexts, scenario definitions and Redis-backed storage

pub mod context;
pub mod scenarios;
pub mod storage;

pub use context::ConversationContext;
pub use scenarios::{Scenario, ScenarioManager, ScenarioStep, StepValidation, InputType};
pub use storage::StateStorage;
