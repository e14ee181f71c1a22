//! Notification service implementation
//!
//! Sends order notifications to the configured admins.

use teloxide::{Bot, types::ChatId, prelude::*};
use tracing::{error, info};
use crate::config::settings::Settings;
use crate::services::order::PlacedOrder;
use crate::utils::errors::Result;
use crate::utils::helpers::{format_price, format_timestamp};

/// Notification service for admin messages
#[derive(Clone)]
pub struct NotificationService {
    bot: Bot,
    admin_ids: Vec<i64>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(bot: Bot, settings: &Settings) -> Self {
        Self {
            bot,
            admin_ids: settings.bot.admin_ids.clone(),
        }
    }

    /// Tell every admin about a freshly placed order. A failure for one
    /// admin is logged and does not stop delivery to the others.
    pub async fn notify_new_order(&self, placed: &PlacedOrder) -> Result<()> {
        let text = Self::format_new_order(placed);

        for admin_id in &self.admin_ids {
            if let Err(e) = self.bot.send_message(ChatId(*admin_id), text.clone()).await {
                error!(admin_id = admin_id, error = %e, "Failed to notify admin about order");
            }
        }

        info!(order_id = placed.order.id, admins = self.admin_ids.len(), "Admins notified about new order");
        Ok(())
    }

    /// Build the admin-facing order summary
    fn format_new_order(placed: &PlacedOrder) -> String {
        let mut text = format!(
            "🔔 New order!\n\n\
             📋 Order: #{}\n\
             📅 Date: {}\n\n\
             👤 Customer: {}\n\
             📱 Phone: {}\n\
             🏠 Address: {}\n\n\
             Items:\n",
            placed.order.id,
            format_timestamp(placed.order.created_at),
            placed.customer.name,
            placed.customer.phone,
            placed.customer.address,
        );

        for line in &placed.lines {
            text.push_str(&format!(
                "• {} x {} = {}\n",
                line.product_name,
                line.quantity,
                format_price(line.subtotal()),
            ));
        }

        text.push_str(&format!("\n💵 Total: {}", format_price(placed.total())));
        text
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("admin_ids", &self.admin_ids)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::Customer;
    use crate::models::order::{Order, OrderLine};
    use chrono::Utc;

    #[test]
    fn test_format_new_order() {
        let placed = PlacedOrder {
            order: Order {
                id: 12,
                customer_id: 1,
                status: "new".to_string(),
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            customer: Customer {
                id: 1,
                telegram_id: 777,
                name: "Alisher".to_string(),
                phone: "+998901234567".to_string(),
                address: "Tashkent, Chilonzor 5".to_string(),
                created_at: Utc::now(),
            },
            lines: vec![
                OrderLine {
                    product_name: "Sneakers".to_string(),
                    quantity: 2,
                    price: 40,
                },
            ],
        };

        let text = NotificationService::format_new_order(&placed);
        assert!(text.contains("#12"));
        assert!(text.contains("Alisher"));
        assert!(text.contains("Sneakers x 2"));
        assert!(text.contains("80 so'm"));
    }
}
