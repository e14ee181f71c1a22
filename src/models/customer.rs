//! Customer model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Placeholder value stored until the customer completes checkout
pub const CONTACT_NOT_PROVIDED: &str = "Not provided";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: i64,
    pub telegram_id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Whether checkout has ever filled in real contact details
    pub fn has_contact_details(&self) -> bool {
        self.phone != CONTACT_NOT_PROVIDED && self.address != CONTACT_NOT_PROVIDED
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub telegram_id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
