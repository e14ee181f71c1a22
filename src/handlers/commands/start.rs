//! Start command handler
//!
//! Handles the /start command for shop customers

use teloxide::{Bot, types::{Message, InlineKeyboardMarkup, InlineKeyboardButton}, prelude::*};
use tracing::{debug, info};
use crate::utils::errors::Result;
use crate::services::ServiceFactory;

/// Handle /start command - greet the customer and show the main menu
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        crate::utils::errors::BazarBotError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    debug!(user_id = user_id, chat_id = ?chat_id, "Processing /start command");

    // Only meaningful in private chats
    if !chat_id.is_user() {
        bot.send_message(chat_id, "Please message me in a private chat to shop.").await?;
        return Ok(());
    }

    let customer = services
        .database
        .initialize_customer(user_id, Some(user.full_name()))
        .await?;

    let welcome_text = format!(
        "👋 Welcome to the shop, {}!\n\n\
         🛍 Browse the catalog, add products to your cart and place an order right here.\n\n\
         Commands:\n\
         /catalog — browse products by category\n\
         /cart — view your cart\n\
         /orders — your order history\n\
         /help — help",
        customer.name
    );

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("🛍 Catalog", "catalog:open"),
            InlineKeyboardButton::callback("🛒 Cart", "cart:view"),
        ],
    ]);

    bot.send_message(chat_id, welcome_text)
        .reply_markup(keyboard)
        .await?;

    info!(user_id = user_id, "Customer started the bot");
    Ok(())
}
