//! Mirrored channel post model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::utils::helpers::format_price;

/// A product entry mirrored from the shop channel
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChannelPost {
    pub id: i64,
    pub channel_id: i64,
    pub message_id: i64,
    pub name: String,
    pub caption: String,
    pub price: i64,
    pub category: String,
    pub image_file_id: Option<String>,
    pub posted_at: DateTime<Utc>,
}

impl ChannelPost {
    pub fn formatted_price(&self) -> String {
        format_price(self.price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChannelPostRequest {
    pub channel_id: i64,
    pub message_id: i64,
    pub name: String,
    pub caption: String,
    pub price: i64,
    pub category: String,
    pub image_file_id: Option<String>,
}
