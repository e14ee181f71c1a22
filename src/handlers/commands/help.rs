//! Help command handler

use teloxide::{Bot, types::Message, prelude::*};
use crate::utils::errors::Result;

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    let help_text = "ℹ️ Shop bot help\n\n\
        /start — main menu\n\
        /catalog — browse products by category\n\
        /cart — view and manage your cart\n\
        /orders — your order history\n\n\
        To order: open the catalog, pick a product, choose a quantity, \
        then check out from the cart. An operator will contact you after \
        the order is placed.";

    bot.send_message(msg.chat.id, help_text).await?;
    Ok(())
}
