//! Cart and checkout handlers
//!
//! Cart view/clear plus the checkout conversation: name -> phone ->
//! address -> confirmation.

use teloxide::{Bot, types::{Message, ChatId, InlineKeyboardMarkup, InlineKeyboardButton}, prelude::*};
use tracing::{debug, info};
use crate::utils::errors::{BazarBotError, Result};
use crate::utils::helpers::format_price;
use crate::models::cart::cart_total;
use crate::services::ServiceFactory;
use crate::state::{ConversationContext, ScenarioManager, StateStorage};

/// Handle /cart command - show the cart with checkout buttons
pub async fn handle_cart(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BazarBotError::InvalidInput("No user in message".to_string())
    })?;

    show_cart(bot, msg.chat.id, user.id.0 as i64, &services).await
}

/// Render the cart contents
pub async fn show_cart(bot: Bot, chat_id: ChatId, user_id: i64, services: &ServiceFactory) -> Result<()> {
    let lines = services.cart_service.view_cart(user_id).await?;

    if lines.is_empty() {
        bot.send_message(
            chat_id,
            "🛒 Your cart is empty. Use /catalog to find something nice.",
        )
        .await?;
        return Ok(());
    }

    let mut text = "🛒 Your cart:\n\n".to_string();
    for line in &lines {
        text.push_str(&format!(
            "📦 {}\n💰 {} x {} = {}\n\n",
            line.product_name,
            format_price(line.price),
            line.quantity,
            format_price(line.subtotal()),
        ));
    }
    text.push_str(&format!("💵 Total: {}", format_price(cart_total(&lines))));

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("✅ Checkout", "cart:checkout")],
        vec![
            InlineKeyboardButton::callback("🗑 Clear cart", "cart:clear"),
            InlineKeyboardButton::callback("🛍 Keep shopping", "catalog:open"),
        ],
    ]);

    bot.send_message(chat_id, text).reply_markup(keyboard).await?;
    Ok(())
}

/// Empty the cart
pub async fn handle_clear_callback(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    services: ServiceFactory,
) -> Result<()> {
    let removed = services.cart_service.clear_cart(user_id).await?;
    debug!(user_id = user_id, removed = removed, "Cart cleared by user");

    bot.send_message(chat_id, "✅ Cart cleared.").await?;
    Ok(())
}

/// Start the checkout conversation
pub async fn handle_checkout_callback(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let lines = services.cart_service.view_cart(user_id).await?;
    if lines.is_empty() {
        bot.send_message(chat_id, "🛒 Your cart is empty, nothing to check out.").await?;
        return Ok(());
    }

    let mut context = ConversationContext::new(user_id);
    scenario_manager.start_scenario(&mut context, "checkout")?;
    state_storage.save_context(&context).await?;

    bot.send_message(
        chat_id,
        "🧾 Checkout\n\nPlease enter your full name (or send /cancel to abort):",
    )
    .await?;

    info!(user_id = user_id, "Checkout started");
    Ok(())
}

/// Checkout step: customer name
pub async fn handle_name_input(
    bot: Bot,
    msg: Message,
    mut context: ConversationContext,
    _services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let name = msg.text().unwrap_or("").trim();

    if let Err(e) = scenario_manager.validate_input(&context, name) {
        debug!(user_id = context.user_id, error = %e, "Invalid checkout name");
        bot.send_message(chat_id, "⚠️ Please enter your full name (2-100 characters):").await?;
        return Ok(());
    }

    context.set_data("name", name)?;
    scenario_manager.next_step(&mut context, "phone_input")?;
    state_storage.save_context(&context).await?;

    bot.send_message(chat_id, "📱 Now enter your phone number:").await?;
    Ok(())
}

/// Checkout step: phone number
pub async fn handle_phone_input(
    bot: Bot,
    msg: Message,
    mut context: ConversationContext,
    _services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;

    // A shared contact also carries the number
    let phone = msg
        .contact()
        .map(|contact| contact.phone_number.clone())
        .or_else(|| msg.text().map(|text| text.trim().to_string()))
        .unwrap_or_default();

    if let Err(e) = scenario_manager.validate_input(&context, &phone) {
        debug!(user_id = context.user_id, error = %e, "Invalid checkout phone");
        bot.send_message(chat_id, "⚠️ Please enter a valid phone number:").await?;
        return Ok(());
    }

    context.set_data("phone", &phone)?;
    scenario_manager.next_step(&mut context, "address_input")?;
    state_storage.save_context(&context).await?;

    bot.send_message(chat_id, "🏠 Delivery address (city, street, house):").await?;
    Ok(())
}

/// Checkout step: address, then show the order summary
pub async fn handle_address_input(
    bot: Bot,
    msg: Message,
    mut context: ConversationContext,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let address = msg.text().unwrap_or("").trim();

    if let Err(e) = scenario_manager.validate_input(&context, address) {
        debug!(user_id = context.user_id, error = %e, "Invalid checkout address");
        bot.send_message(chat_id, "⚠️ Please enter a delivery address (5-255 characters):").await?;
        return Ok(());
    }

    context.set_data("address", address)?;
    scenario_manager.next_step(&mut context, "confirmation")?;
    state_storage.save_context(&context).await?;

    // The cart may have been emptied while the form was being filled
    let lines = services.cart_service.view_cart(context.user_id).await?;
    if lines.is_empty() {
        state_storage.delete_context(context.user_id).await?;
        bot.send_message(chat_id, "⚠️ Your cart is empty, checkout cancelled.").await?;
        return Ok(());
    }

    let name = context.get_string("name").unwrap_or_default();
    let phone = context.get_string("phone").unwrap_or_default();

    let mut text = format!(
        "🧾 Order summary:\n\n👤 Name: {}\n📱 Phone: {}\n🏠 Address: {}\n\nItems:\n",
        name, phone, address
    );
    for line in &lines {
        text.push_str(&format!(
            "• {} x {} = {}\n",
            line.product_name,
            line.quantity,
            format_price(line.subtotal()),
        ));
    }
    text.push_str(&format!("\n💵 Total: {}", format_price(cart_total(&lines))));

    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Confirm order", "checkout:confirm"),
        InlineKeyboardButton::callback("❌ Cancel", "checkout:cancel"),
    ]]);

    bot.send_message(chat_id, text).reply_markup(keyboard).await?;
    Ok(())
}

/// Place the order after the customer confirms the summary
pub async fn handle_confirm_callback(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    services: ServiceFactory,
    state_storage: StateStorage,
) -> Result<()> {
    let Some(context) = state_storage.load_context(user_id).await? else {
        bot.send_message(chat_id, "⚠️ This checkout has expired, start again from /cart.").await?;
        return Ok(());
    };

    if !context.is_at("checkout", "confirmation") {
        debug!(user_id = user_id, state = ?context.current_state(), "Confirm pressed outside checkout confirmation");
        return Ok(());
    }

    let name = context.get_string("name").unwrap_or_default();
    let phone = context.get_string("phone").unwrap_or_default();
    let address = context.get_string("address").unwrap_or_default();

    match services
        .order_service
        .place_order(user_id, name, phone, address)
        .await
    {
        Ok(placed) => {
            state_storage.delete_context(user_id).await?;

            bot.send_message(
                chat_id,
                format!(
                    "✅ Your order has been placed!\n\n\
                     📋 Order number: #{}\n\n\
                     🕒 An operator will contact you shortly.",
                    placed.order.id
                ),
            )
            .await?;

            services.notification_service.notify_new_order(&placed).await?;
        }
        Err(BazarBotError::EmptyCart) => {
            state_storage.delete_context(user_id).await?;
            bot.send_message(chat_id, "⚠️ Your cart is already empty, no order was placed.").await?;
        }
        Err(e) => {
            // The transaction was rolled back, nothing was written
            bot.send_message(
                chat_id,
                "⚠️ Something went wrong while placing the order. Please try again.",
            )
            .await?;
            return Err(e);
        }
    }

    Ok(())
}

/// Abort the checkout conversation
pub async fn handle_cancel_callback(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    state_storage: StateStorage,
) -> Result<()> {
    state_storage.delete_context(user_id).await?;
    bot.send_message(chat_id, "❌ Checkout cancelled. Your cart is untouched.").await?;
    Ok(())
}
