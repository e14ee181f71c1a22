//! Order history command handler

use teloxide::{Bot, types::Message, prelude::*};
use crate::utils::errors::{BazarBotError, Result};
use crate::utils::helpers::{format_price, format_timestamp};
use crate::services::ServiceFactory;

/// Handle /orders command - list the customer's past orders
pub async fn handle_orders(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BazarBotError::InvalidInput("No user in message".to_string())
    })?;

    let history = services
        .order_service
        .order_history(user.id.0 as i64)
        .await?;

    if history.is_empty() {
        bot.send_message(msg.chat.id, "📋 You have no orders yet. Start with /catalog!").await?;
        return Ok(());
    }

    let mut text = "📋 Your orders:\n\n".to_string();
    for (order, total) in &history {
        text.push_str(&format!(
            "#{} — {} — {} — {}\n",
            order.id,
            format_timestamp(order.created_at),
            order.status,
            format_price(*total),
        ));
    }

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}
