//! Callback query handlers module
//!
//! This module contains handlers for all inline keyboard button callbacks

use teloxide::{Bot, types::{CallbackQuery, ChatId}, prelude::*};
use tracing::{debug, warn};
use crate::utils::errors::Result;
use crate::services::ServiceFactory;
use crate::state::{ScenarioManager, StateStorage};
use crate::handlers::commands::{admin, cart, catalog};

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let user = query.from;
    let user_id = user.id.0 as i64;
    let display_name = Some(user.full_name());
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    debug!(user_id = user_id, callback_data = ?query.data, "Processing callback query");

    let Some(data) = query.data else {
        return Ok(());
    };

    // Answer the callback query first to remove the loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let parts: Vec<&str> = data.split(':').collect();
    if parts.is_empty() {
        warn!(data = %data, "Invalid callback data format");
        return Ok(());
    }

    match parts[0] {
        "catalog" => {
            // "catalog:open" - back to category list
            catalog::show_categories(bot, chat_id, &services).await?;
        }
        "category" => {
            if let Some(category_id) = parse_i64(&parts, 1) {
                catalog::handle_category_callback(bot, chat_id, category_id, services).await?;
            }
        }
        "product" => {
            if let Some(product_id) = parse_i64(&parts, 1) {
                catalog::handle_product_callback(bot, chat_id, product_id, services).await?;
            }
        }
        "cart" => match parts.get(1).copied() {
            Some("view") => {
                cart::show_cart(bot, chat_id, user_id, &services).await?;
            }
            Some("add") => {
                if let Some(product_id) = parse_i64(&parts, 2) {
                    catalog::handle_add_to_cart_callback(bot, chat_id, product_id, services).await?;
                }
            }
            Some("clear") => {
                cart::handle_clear_callback(bot, chat_id, user_id, services).await?;
            }
            Some("checkout") => {
                cart::handle_checkout_callback(
                    bot, chat_id, user_id, services, scenario_manager, state_storage,
                ).await?;
            }
            other => {
                warn!(action = ?other, "Unknown cart action");
            }
        },
        "qty" => {
            if let (Some(product_id), Some(quantity)) = (parse_i64(&parts, 1), parse_i64(&parts, 2)) {
                catalog::handle_quantity_callback(
                    bot, chat_id, user_id, display_name, product_id, quantity as i32, services,
                ).await?;
            }
        }
        "checkout" => match parts.get(1).copied() {
            Some("confirm") => {
                cart::handle_confirm_callback(bot, chat_id, user_id, services, state_storage).await?;
            }
            Some("cancel") => {
                cart::handle_cancel_callback(bot, chat_id, user_id, state_storage).await?;
            }
            other => {
                warn!(action = ?other, "Unknown checkout action");
            }
        },
        "admin" => {
            let admin_parts: Vec<String> = parts[1..].iter().map(|s| s.to_string()).collect();
            admin::handle_admin_callback(
                bot, chat_id, user_id, admin_parts, services, scenario_manager, state_storage,
            ).await?;
        }
        action => {
            warn!(action = %action, "Unknown callback action");
        }
    }

    debug!(user_id = user_id, "Callback query processed");
    Ok(())
}

fn parse_i64(parts: &[&str], index: usize) -> Option<i64> {
    parts.get(index).and_then(|raw| raw.parse::<i64>().ok())
}
