//! Admin command handlers
//!
//! Admin panel: product management, category management, order review
//! and shop statistics. Only user IDs from the bot configuration get in.

use teloxide::{Bot, types::{Message, ChatId, InlineKeyboardMarkup, InlineKeyboardButton}, prelude::*};
use tracing::{debug, info, warn};
use crate::utils::errors::{BazarBotError, Result};
use crate::utils::helpers::{format_price, format_timestamp};
use crate::utils::logging::log_admin_action;
use crate::models::order::OrderStatus;
use crate::models::product::{CreateProductRequest, UpdateProductRequest};
use crate::services::ServiceFactory;
use crate::state::{ConversationContext, ScenarioManager, StateStorage};

/// Handle /admin command - show admin panel
pub async fn handle_admin_panel(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BazarBotError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    debug!(user_id = user_id, chat_id = ?chat_id, "Processing /admin command");

    if !services.auth_service.can_access_admin_panel(user_id) {
        bot.send_message(chat_id, "⛔ Sorry, you do not have administrator rights.").await?;
        return Ok(());
    }

    show_admin_main_menu(bot, chat_id).await?;
    info!(user_id = user_id, "Admin accessed admin panel");
    Ok(())
}

/// Show admin main menu
async fn show_admin_main_menu(bot: Bot, chat_id: ChatId) -> Result<()> {
    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("📦 Products", "admin:products"),
            InlineKeyboardButton::callback("📁 Categories", "admin:categories"),
        ],
        vec![
            InlineKeyboardButton::callback("📋 Orders", "admin:orders"),
            InlineKeyboardButton::callback("📊 Statistics", "admin:stats"),
        ],
    ]);

    bot.send_message(chat_id, "👨‍💼 Admin panel\n\nChoose a section:")
        .reply_markup(keyboard)
        .await?;

    Ok(())
}

/// Handle admin panel callbacks. `parts` is the callback data split on
/// ':' with the leading "admin" removed.
pub async fn handle_admin_callback(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    parts: Vec<String>,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    if !services.auth_service.can_access_admin_panel(user_id) {
        bot.send_message(chat_id, "⛔ Sorry, you do not have administrator rights.").await?;
        return Ok(());
    }

    let action = parts.first().map(String::as_str).unwrap_or("");
    debug!(user_id = user_id, action = %action, "Admin panel action");

    match action {
        "back" => show_admin_main_menu(bot, chat_id).await?,
        "products" => show_product_list(bot, chat_id, &services).await?,
        "product" => {
            if let Some(product_id) = parse_id(&parts, 1) {
                show_product_card(bot, chat_id, product_id, &services).await?;
            }
        }
        "edit" => {
            if let (Some(field), Some(product_id)) = (parts.get(1), parse_id(&parts, 2)) {
                start_edit_product(
                    bot, chat_id, user_id, field, product_id,
                    &services, &scenario_manager, &state_storage,
                ).await?;
            }
        }
        "delete" => {
            if let Some(product_id) = parse_id(&parts, 1) {
                confirm_delete_product(bot, chat_id, product_id, &services).await?;
            }
        }
        "confirm_delete" => {
            if let Some(product_id) = parse_id(&parts, 1) {
                delete_product(bot, chat_id, user_id, product_id, &services).await?;
            }
        }
        "add_product" => {
            start_scenario_with_prompt(
                bot, chat_id, user_id, "add_product",
                "📦 New product\n\nEnter the product name:",
                &scenario_manager, &state_storage,
            ).await?;
        }
        "categories" => show_category_list(bot, chat_id, &services).await?,
        "add_category" => {
            start_scenario_with_prompt(
                bot, chat_id, user_id, "add_category",
                "📁 New category\n\nEnter the category name:",
                &scenario_manager, &state_storage,
            ).await?;
        }
        "create_confirm" => create_product_from_context(bot, chat_id, user_id, &services, &state_storage).await?,
        "create_cancel" => {
            state_storage.delete_context(user_id).await?;
            bot.send_message(chat_id, "❌ Product creation cancelled.").await?;
        }
        "orders" => show_recent_orders(bot, chat_id, &services).await?,
        "order" => {
            if let Some(order_id) = parse_id(&parts, 1) {
                show_order_details(bot, chat_id, order_id, &services).await?;
            }
        }
        "status" => {
            if let (Some(order_id), Some(status)) = (
                parse_id(&parts, 1),
                parts.get(2).and_then(|s| OrderStatus::parse(s)),
            ) {
                update_order_status(bot, chat_id, user_id, order_id, status, &services).await?;
            }
        }
        "stats" => show_statistics(bot, chat_id, &services).await?,
        _ => {
            warn!(user_id = user_id, action = %action, "Unknown admin action");
        }
    }

    Ok(())
}

fn parse_id(parts: &[String], index: usize) -> Option<i64> {
    parts.get(index).and_then(|raw| raw.parse::<i64>().ok())
}

/// List all products for management
async fn show_product_list(bot: Bot, chat_id: ChatId, services: &ServiceFactory) -> Result<()> {
    let products = services.database.products.list_all().await?;

    let mut rows: Vec<Vec<InlineKeyboardButton>> = products
        .iter()
        .map(|product| {
            vec![InlineKeyboardButton::callback(
                format!("{} — {}", product.name, product.formatted_price()),
                format!("admin:product:{}", product.id),
            )]
        })
        .collect();

    rows.push(vec![InlineKeyboardButton::callback("➕ Add product", "admin:add_product")]);
    rows.push(vec![InlineKeyboardButton::callback("⬅️ Back", "admin:back")]);

    bot.send_message(chat_id, "📦 Product management\n\nPick a product:")
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;

    Ok(())
}

/// Product card with edit and delete controls
async fn show_product_card(bot: Bot, chat_id: ChatId, product_id: i64, services: &ServiceFactory) -> Result<()> {
    let Some(product) = services.database.products.find_by_id(product_id).await? else {
        bot.send_message(chat_id, "⚠️ Product not found.").await?;
        return Ok(());
    };

    let category_name = services
        .database
        .categories
        .find_by_id(product.category_id)
        .await?
        .map(|category| category.name)
        .unwrap_or_else(|| "—".to_string());

    let text = format!(
        "📦 {}\n\n\
         📝 Description: {}\n\
         💰 Price: {}\n\
         🔗 Image: {}\n\
         📂 Category: {}\n\
         ✅ Available: {}",
        product.name,
        product.description.as_deref().unwrap_or("—"),
        product.formatted_price(),
        product.image_url.as_deref().unwrap_or("—"),
        category_name,
        if product.is_available { "yes" } else { "no" },
    );

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("✏️ Name", format!("admin:edit:name:{}", product.id)),
            InlineKeyboardButton::callback("✏️ Description", format!("admin:edit:description:{}", product.id)),
        ],
        vec![
            InlineKeyboardButton::callback("✏️ Price", format!("admin:edit:price:{}", product.id)),
            InlineKeyboardButton::callback("✏️ Image", format!("admin:edit:image:{}", product.id)),
        ],
        vec![InlineKeyboardButton::callback("🗑 Delete", format!("admin:delete:{}", product.id))],
        vec![InlineKeyboardButton::callback("⬅️ Back", "admin:products")],
    ]);

    bot.send_message(chat_id, text).reply_markup(keyboard).await?;
    Ok(())
}

/// Begin a single-field product edit conversation
async fn start_edit_product(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    field: &str,
    product_id: i64,
    services: &ServiceFactory,
    scenario_manager: &ScenarioManager,
    state_storage: &StateStorage,
) -> Result<()> {
    if !matches!(field, "name" | "description" | "price" | "image") {
        warn!(field = %field, "Unknown product field to edit");
        return Ok(());
    }

    if services.database.products.find_by_id(product_id).await?.is_none() {
        bot.send_message(chat_id, "⚠️ Product not found.").await?;
        return Ok(());
    }

    let mut context = ConversationContext::new(user_id);
    scenario_manager.start_scenario(&mut context, "edit_product")?;
    context.set_data("product_id", product_id)?;
    context.set_data("field", field)?;
    state_storage.save_context(&context).await?;

    let prompt = match field {
        "name" => "✏️ Enter the new product name:",
        "description" => "✏️ Enter the new description:",
        "price" => "✏️ Enter the new price (a number):",
        _ => "✏️ Enter the new image URL:",
    };

    bot.send_message(chat_id, prompt).await?;
    Ok(())
}

/// Ask for confirmation before deleting a product
async fn confirm_delete_product(bot: Bot, chat_id: ChatId, product_id: i64, services: &ServiceFactory) -> Result<()> {
    let Some(product) = services.database.products.find_by_id(product_id).await? else {
        bot.send_message(chat_id, "⚠️ Product not found.").await?;
        return Ok(());
    };

    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Yes, delete", format!("admin:confirm_delete:{}", product.id)),
        InlineKeyboardButton::callback("❌ No, keep it", format!("admin:product:{}", product.id)),
    ]]);

    bot.send_message(
        chat_id,
        format!("⚠️ Delete the product \"{}\"? This cannot be undone.", product.name),
    )
    .reply_markup(keyboard)
    .await?;

    Ok(())
}

/// Delete the product after confirmation
async fn delete_product(bot: Bot, chat_id: ChatId, admin_id: i64, product_id: i64, services: &ServiceFactory) -> Result<()> {
    match services.database.products.delete(product_id).await {
        Ok(()) => {
            log_admin_action(admin_id, "delete_product", Some(&product_id.to_string()), None);
            bot.send_message(chat_id, "✅ Product deleted.").await?;
        }
        Err(BazarBotError::ProductNotFound { .. }) => {
            bot.send_message(chat_id, "⚠️ Product not found.").await?;
        }
        Err(e) => return Err(e),
    }

    show_product_list(bot, chat_id, services).await
}

/// Start a scenario and send its opening prompt
async fn start_scenario_with_prompt(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    scenario_id: &str,
    prompt: &str,
    scenario_manager: &ScenarioManager,
    state_storage: &StateStorage,
) -> Result<()> {
    let mut context = ConversationContext::new(user_id);
    scenario_manager.start_scenario(&mut context, scenario_id)?;
    state_storage.save_context(&context).await?;

    bot.send_message(chat_id, format!("{}\n\nSend /cancel to abort.", prompt)).await?;
    Ok(())
}

/// List categories with product counts
async fn show_category_list(bot: Bot, chat_id: ChatId, services: &ServiceFactory) -> Result<()> {
    let categories = services.database.categories.list().await?;

    let mut text = "📁 Categories:\n\n".to_string();
    if categories.is_empty() {
        text.push_str("(none yet)\n");
    }
    for category in &categories {
        let products = services.database.products.list_by_category(category.id).await?;
        text.push_str(&format!("• {} — {} products\n", category.name, products.len()));
    }

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("➕ Add category", "admin:add_category")],
        vec![InlineKeyboardButton::callback("⬅️ Back", "admin:back")],
    ]);

    bot.send_message(chat_id, text).reply_markup(keyboard).await?;
    Ok(())
}

/// Recent orders overview
async fn show_recent_orders(bot: Bot, chat_id: ChatId, services: &ServiceFactory) -> Result<()> {
    let orders = services.order_service.recent_orders(20).await?;

    if orders.is_empty() {
        bot.send_message(chat_id, "📋 No orders yet.").await?;
        return Ok(());
    }

    let mut rows: Vec<Vec<InlineKeyboardButton>> = orders
        .iter()
        .map(|order| {
            vec![InlineKeyboardButton::callback(
                format!("#{} — {} — {}", order.id, order.status, format_timestamp(order.created_at)),
                format!("admin:order:{}", order.id),
            )]
        })
        .collect();

    rows.push(vec![InlineKeyboardButton::callback("⬅️ Back", "admin:back")]);

    bot.send_message(chat_id, "📋 Recent orders:")
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;

    Ok(())
}

/// Single order with status controls
async fn show_order_details(bot: Bot, chat_id: ChatId, order_id: i64, services: &ServiceFactory) -> Result<()> {
    let (order, lines) = match services.order_service.order_details(order_id).await {
        Ok(details) => details,
        Err(BazarBotError::OrderNotFound { .. }) => {
            bot.send_message(chat_id, "⚠️ Order not found.").await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let total: i64 = lines.iter().map(|line| line.subtotal()).sum();

    let mut text = format!(
        "📋 Order #{}\n📅 {}\n🚚 Status: {}\n\nItems:\n",
        order.id,
        format_timestamp(order.created_at),
        order.status,
    );
    for line in &lines {
        text.push_str(&format!(
            "• {} x {} = {}\n",
            line.product_name,
            line.quantity,
            format_price(line.subtotal()),
        ));
    }
    text.push_str(&format!("\n💵 Total: {}", format_price(total)));

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("⏳ Processing", format!("admin:status:{}:processing", order.id)),
            InlineKeyboardButton::callback("🚚 Shipped", format!("admin:status:{}:shipped", order.id)),
        ],
        vec![
            InlineKeyboardButton::callback("✅ Delivered", format!("admin:status:{}:delivered", order.id)),
            InlineKeyboardButton::callback("❌ Cancelled", format!("admin:status:{}:cancelled", order.id)),
        ],
        vec![InlineKeyboardButton::callback("⬅️ Back", "admin:orders")],
    ]);

    bot.send_message(chat_id, text).reply_markup(keyboard).await?;
    Ok(())
}

/// Apply a status change to an order
async fn update_order_status(
    bot: Bot,
    chat_id: ChatId,
    admin_id: i64,
    order_id: i64,
    status: OrderStatus,
    services: &ServiceFactory,
) -> Result<()> {
    match services.order_service.set_status(order_id, status).await {
        Ok(order) => {
            log_admin_action(admin_id, "update_order_status", Some(&order_id.to_string()), Some(status.as_str()));
            bot.send_message(chat_id, format!("✅ Order #{} is now {}.", order.id, order.status)).await?;
        }
        Err(BazarBotError::OrderNotFound { .. }) => {
            bot.send_message(chat_id, "⚠️ Order not found.").await?;
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Shop-wide counters
async fn show_statistics(bot: Bot, chat_id: ChatId, services: &ServiceFactory) -> Result<()> {
    let stats = services.database.get_system_stats().await?;

    let text = format!(
        "📊 Statistics\n\n\
         • Products: {}\n\
         • Categories: {}\n\
         • Customers: {}\n\
         • Orders: {}\n\
         • Mirrored channel posts: {}",
        stats["products"], stats["categories"], stats["customers"], stats["orders"], stats["channel_posts"],
    );

    bot.send_message(chat_id, text).await?;
    Ok(())
}

/// Parse a price message like "150 000" or "150,000"
fn parse_price(input: &str) -> Option<i64> {
    let digits = input.trim().replace([' ', ','], "");
    digits.parse::<i64>().ok().filter(|price| *price > 0)
}

/// Handle a message while the admin is in the add_product scenario
pub async fn handle_add_product_input(
    bot: Bot,
    msg: Message,
    mut context: ConversationContext,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let input = msg.text().unwrap_or("").trim().to_string();
    let step = context.step.clone().unwrap_or_default();

    match step.as_str() {
        "name_input" => {
            if scenario_manager.validate_input(&context, &input).is_err() {
                bot.send_message(chat_id, "⚠️ Product name should be 2-100 characters, try again:").await?;
                return Ok(());
            }
            context.set_data("name", &input)?;
            scenario_manager.next_step(&mut context, "price_input")?;
            state_storage.save_context(&context).await?;
            bot.send_message(chat_id, "💰 Price (a number):").await?;
        }
        "price_input" => {
            let Some(price) = parse_price(&input) else {
                bot.send_message(chat_id, "⚠️ Please enter a positive number:").await?;
                return Ok(());
            };
            context.set_data("price", price)?;
            scenario_manager.next_step(&mut context, "description_input")?;
            state_storage.save_context(&context).await?;
            bot.send_message(chat_id, "📝 Description (or '-' to skip):").await?;
        }
        "description_input" => {
            if input != "-" {
                if scenario_manager.validate_input(&context, &input).is_err() {
                    bot.send_message(chat_id, "⚠️ Description is limited to 1000 characters, try again:").await?;
                    return Ok(());
                }
                context.set_data("description", &input)?;
            }
            scenario_manager.next_step(&mut context, "image_input")?;
            state_storage.save_context(&context).await?;
            bot.send_message(chat_id, "🔗 Image URL (or '-' to skip):").await?;
        }
        "image_input" => {
            if input != "-" {
                if scenario_manager.validate_input(&context, &input).is_err() {
                    bot.send_message(chat_id, "⚠️ That does not look like a URL, try again:").await?;
                    return Ok(());
                }
                context.set_data("image_url", &input)?;
            }
            scenario_manager.next_step(&mut context, "category_input")?;
            state_storage.save_context(&context).await?;

            let categories = services.database.categories.list().await?;
            let names: Vec<String> = categories.into_iter().map(|c| c.name).collect();
            let hint = if names.is_empty() {
                "📂 Category name (a new one will be created):".to_string()
            } else {
                format!("📂 Category name (existing: {}):", names.join(", "))
            };
            bot.send_message(chat_id, hint).await?;
        }
        "category_input" => {
            if input.is_empty() {
                bot.send_message(chat_id, "⚠️ Please enter a category name:").await?;
                return Ok(());
            }
            context.set_data("category", &input)?;
            scenario_manager.next_step(&mut context, "confirmation")?;
            state_storage.save_context(&context).await?;

            let name = context.get_string("name").unwrap_or_default();
            let price = context.get_i64("price").unwrap_or_default();
            let description = context.get_string("description").unwrap_or_else(|| "—".to_string());

            let text = format!(
                "📦 New product\n\n\
                 Name: {}\n\
                 Price: {}\n\
                 Description: {}\n\
                 Category: {}\n\n\
                 Create it?",
                name, format_price(price), description, input,
            );

            let keyboard = InlineKeyboardMarkup::new(vec![vec![
                InlineKeyboardButton::callback("✅ Create", "admin:create_confirm"),
                InlineKeyboardButton::callback("❌ Cancel", "admin:create_cancel"),
            ]]);

            bot.send_message(chat_id, text).reply_markup(keyboard).await?;
        }
        "confirmation" => {
            bot.send_message(chat_id, "Please confirm or cancel with the buttons above.").await?;
        }
        other => {
            warn!(step = %other, "Unknown add_product step");
            state_storage.delete_context(context.user_id).await?;
        }
    }

    Ok(())
}

/// Create the product collected by the add_product scenario
async fn create_product_from_context(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    services: &ServiceFactory,
    state_storage: &StateStorage,
) -> Result<()> {
    let Some(context) = state_storage.load_context(user_id).await? else {
        bot.send_message(chat_id, "⚠️ This form has expired, start again.").await?;
        return Ok(());
    };

    if !context.is_at("add_product", "confirmation") {
        debug!(user_id = user_id, state = ?context.current_state(), "Create pressed outside add_product confirmation");
        return Ok(());
    }

    let name = context.get_string("name").unwrap_or_default();
    let price = context.get_i64("price").unwrap_or_default();
    let category_name = context.get_string("category").unwrap_or_default();

    let category = services.database.ensure_category(&category_name).await?;

    let product = services
        .database
        .products
        .create(CreateProductRequest {
            name,
            description: context.get_string("description"),
            price,
            image_url: context.get_string("image_url"),
            category_id: category.id,
        })
        .await?;

    state_storage.delete_context(user_id).await?;
    log_admin_action(user_id, "create_product", Some(&product.id.to_string()), Some(&product.name));

    bot.send_message(
        chat_id,
        format!("✅ Product \"{}\" created in {}.", product.name, category.name),
    )
    .await?;

    Ok(())
}

/// Handle a message while the admin is in the edit_product scenario
pub async fn handle_edit_product_input(
    bot: Bot,
    msg: Message,
    context: ConversationContext,
    services: ServiceFactory,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let input = msg.text().unwrap_or("").trim().to_string();

    let Some(product_id) = context.get_i64("product_id") else {
        state_storage.delete_context(context.user_id).await?;
        return Ok(());
    };
    let field = context.get_string("field").unwrap_or_default();

    let mut request = UpdateProductRequest::default();
    match field.as_str() {
        "name" => {
            if input.len() < 2 || input.len() > 100 {
                bot.send_message(chat_id, "⚠️ Name should be 2-100 characters, try again:").await?;
                return Ok(());
            }
            request.name = Some(input);
        }
        "description" => {
            if input.is_empty() {
                bot.send_message(chat_id, "⚠️ Please enter a description:").await?;
                return Ok(());
            }
            request.description = Some(input);
        }
        "price" => {
            let Some(price) = parse_price(&input) else {
                bot.send_message(chat_id, "⚠️ Please enter a positive number:").await?;
                return Ok(());
            };
            request.price = Some(price);
        }
        "image" => {
            if url::Url::parse(&input).is_err() {
                bot.send_message(chat_id, "⚠️ That does not look like a URL, try again:").await?;
                return Ok(());
            }
            request.image_url = Some(input);
        }
        other => {
            warn!(field = %other, "Unknown product field in edit context");
            state_storage.delete_context(context.user_id).await?;
            return Ok(());
        }
    }

    match services.database.products.update(product_id, request).await {
        Ok(product) => {
            state_storage.delete_context(context.user_id).await?;
            log_admin_action(context.user_id, "edit_product", Some(&product_id.to_string()), Some(&field));
            bot.send_message(chat_id, format!("✅ Product \"{}\" updated.", product.name)).await?;
        }
        Err(BazarBotError::ProductNotFound { .. }) => {
            state_storage.delete_context(context.user_id).await?;
            bot.send_message(chat_id, "⚠️ Product not found.").await?;
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Handle a message while the admin is in the add_category scenario
pub async fn handle_add_category_input(
    bot: Bot,
    msg: Message,
    context: ConversationContext,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let input = msg.text().unwrap_or("").trim().to_string();

    if scenario_manager.validate_input(&context, &input).is_err() {
        bot.send_message(chat_id, "⚠️ Category name should be 2-100 characters, try again:").await?;
        return Ok(());
    }

    if services.database.categories.find_by_name(&input).await?.is_some() {
        state_storage.delete_context(context.user_id).await?;
        bot.send_message(chat_id, format!("⚠️ Category \"{}\" already exists.", input)).await?;
        return Ok(());
    }

    let category = services.database.ensure_category(&input).await?;
    state_storage.delete_context(context.user_id).await?;
    log_admin_action(context.user_id, "create_category", Some(&category.id.to_string()), Some(&category.name));

    bot.send_message(chat_id, format!("✅ Category \"{}\" created.", category.name)).await?;
    Ok(())
}
