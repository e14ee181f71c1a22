//! Message handlers module
//!
//! Routes plain text messages into the active conversation scenario
//! (checkout or an admin form), or answers with a command hint.

use teloxide::{Bot, types::Message, prelude::*};
use tracing::{debug, warn};
use crate::utils::errors::{BazarBotError, Result};
use crate::services::ServiceFactory;
use crate::state::{ScenarioManager, StateStorage};
use crate::handlers::commands::{admin, cart};

/// Handle incoming text messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BazarBotError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    // Conversations only happen in private chats
    if !chat_id.is_user() {
        return Ok(());
    }

    // /cancel aborts any active conversation
    if msg.text() == Some("/cancel") {
        if state_storage.context_exists(user_id).await? {
            state_storage.delete_context(user_id).await?;
            bot.send_message(chat_id, "❌ Cancelled.").await?;
        }
        return Ok(());
    }

    if let Some(context) = state_storage.load_context(user_id).await? {
        return handle_conversation_message(
            bot, msg, context, services, scenario_manager, state_storage,
        ).await;
    }

    handle_regular_message(bot, msg).await
}

/// Handle conversation-based messages (when user is in a scenario)
async fn handle_conversation_message(
    bot: Bot,
    msg: Message,
    context: crate::state::ConversationContext,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let scenario = context.scenario.clone().unwrap_or_default();
    let step = context.step.clone().unwrap_or_default();

    debug!(scenario = %scenario, step = %step, "Handling conversation message");

    match (scenario.as_str(), step.as_str()) {
        ("checkout", "name_input") => {
            cart::handle_name_input(bot, msg, context, services, scenario_manager, state_storage).await
        }
        ("checkout", "phone_input") => {
            cart::handle_phone_input(bot, msg, context, services, scenario_manager, state_storage).await
        }
        ("checkout", "address_input") => {
            cart::handle_address_input(bot, msg, context, services, scenario_manager, state_storage).await
        }
        ("checkout", "confirmation") => {
            // Confirmation happens via the inline buttons
            bot.send_message(msg.chat.id, "Please confirm or cancel the order with the buttons above.").await?;
            Ok(())
        }
        ("add_product", _) => {
            admin::handle_add_product_input(bot, msg, context, services, scenario_manager, state_storage).await
        }
        ("edit_product", "value_input") => {
            admin::handle_edit_product_input(bot, msg, context, services, state_storage).await
        }
        ("add_category", "name_input") => {
            admin::handle_add_category_input(bot, msg, context, services, scenario_manager, state_storage).await
        }
        _ => {
            // Unknown scenario/step - clear context and handle as regular message
            warn!(scenario = %scenario, step = %step, "Unknown conversation state");
            state_storage.delete_context(context.user_id).await?;
            handle_regular_message(bot, msg).await
        }
    }
}

/// Handle regular messages (no active conversation)
async fn handle_regular_message(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(
        msg.chat.id,
        "I did not get that. Try /catalog, /cart, /orders or /help.",
    )
    .await?;

    Ok(())
}
