//! Catalog browsing handlers
//!
//! Category list, product list, product card and the add-to-cart flow.

use teloxide::{Bot, types::{Message, ChatId, InlineKeyboardMarkup, InlineKeyboardButton, InputFile}, prelude::*};
use tracing::{debug, warn};
use crate::utils::errors::Result;
use crate::utils::helpers::truncate_text;
use crate::services::ServiceFactory;

/// Handle /catalog command - show category list
pub async fn handle_catalog(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    show_categories(bot, msg.chat.id, &services).await
}

/// Show the category list as an inline keyboard
pub async fn show_categories(bot: Bot, chat_id: ChatId, services: &ServiceFactory) -> Result<()> {
    let categories = services.database.categories.list().await?;

    if categories.is_empty() {
        bot.send_message(chat_id, "The catalog is empty for now, come back later!").await?;
        return Ok(());
    }

    let rows: Vec<Vec<InlineKeyboardButton>> = categories
        .iter()
        .map(|category| {
            vec![InlineKeyboardButton::callback(
                category.name.clone(),
                format!("category:{}", category.id),
            )]
        })
        .collect();

    bot.send_message(chat_id, "Choose a category:")
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;

    Ok(())
}

/// Show available products of a category
pub async fn handle_category_callback(
    bot: Bot,
    chat_id: ChatId,
    category_id: i64,
    services: ServiceFactory,
) -> Result<()> {
    let Some(category) = services.database.categories.find_by_id(category_id).await? else {
        bot.send_message(chat_id, "⚠️ Category not found.").await?;
        return Ok(());
    };

    let products = services.database.products.list_by_category(category_id).await?;

    if products.is_empty() {
        bot.send_message(chat_id, format!("No products in {} right now.", category.name)).await?;
        return Ok(());
    }

    let mut rows: Vec<Vec<InlineKeyboardButton>> = products
        .iter()
        .map(|product| {
            vec![InlineKeyboardButton::callback(
                format!("{} — {}", product.name, product.formatted_price()),
                format!("product:{}", product.id),
            )]
        })
        .collect();

    rows.push(vec![InlineKeyboardButton::callback(
        "⬅️ Back to categories",
        "catalog:open",
    )]);

    bot.send_message(chat_id, format!("📂 {}:", category.name))
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;

    Ok(())
}

/// Show a single product card with an add-to-cart button
pub async fn handle_product_callback(
    bot: Bot,
    chat_id: ChatId,
    product_id: i64,
    services: ServiceFactory,
) -> Result<()> {
    let Some(product) = services.database.products.find_by_id(product_id).await? else {
        bot.send_message(chat_id, "⚠️ Sorry, this product is gone.").await?;
        return Ok(());
    };

    let caption = format!(
        "📦 {}\n\n{}\n\n💰 {}",
        product.name,
        product.description.as_deref().unwrap_or(""),
        product.formatted_price(),
    );

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "🛒 Add to cart",
            format!("cart:add:{}", product.id),
        )],
        vec![InlineKeyboardButton::callback(
            "⬅️ Back to products",
            format!("category:{}", product.category_id),
        )],
    ]);

    // Prefer a photo card; fall back to text when the image URL is bad
    let photo = product
        .image_url
        .as_deref()
        .and_then(|raw| url::Url::parse(raw).ok());

    match photo {
        Some(image_url) => {
            bot.send_photo(chat_id, InputFile::url(image_url))
                .caption(truncate_text(&caption, 1024))
                .reply_markup(keyboard)
                .await?;
        }
        None => {
            if product.image_url.is_some() {
                warn!(product_id = product.id, "Product has an unparseable image URL");
            }
            bot.send_message(chat_id, caption)
                .reply_markup(keyboard)
                .await?;
        }
    }

    Ok(())
}

/// Ask for a quantity before adding to the cart
pub async fn handle_add_to_cart_callback(
    bot: Bot,
    chat_id: ChatId,
    product_id: i64,
    services: ServiceFactory,
) -> Result<()> {
    let Some(product) = services.database.products.find_by_id(product_id).await? else {
        bot.send_message(chat_id, "⚠️ Sorry, this product is gone.").await?;
        return Ok(());
    };

    let row = |range: std::ops::RangeInclusive<i32>| -> Vec<InlineKeyboardButton> {
        range
            .map(|n| {
                InlineKeyboardButton::callback(n.to_string(), format!("qty:{}:{}", product_id, n))
            })
            .collect()
    };

    let keyboard = InlineKeyboardMarkup::new(vec![
        row(1..=5),
        row(6..=10),
        vec![InlineKeyboardButton::callback(
            "❌ Cancel",
            format!("product:{}", product_id),
        )],
    ]);

    bot.send_message(
        chat_id,
        format!("📦 {}\n💰 {}\n\n🔢 How many?", product.name, product.formatted_price()),
    )
    .reply_markup(keyboard)
    .await?;

    Ok(())
}

/// Put the chosen quantity into the cart
pub async fn handle_quantity_callback(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    display_name: Option<String>,
    product_id: i64,
    quantity: i32,
    services: ServiceFactory,
) -> Result<()> {
    debug!(user_id = user_id, product_id = product_id, quantity = quantity, "Adding to cart");

    match services
        .cart_service
        .add_to_cart(user_id, display_name, product_id, quantity)
        .await
    {
        Ok(product) => {
            bot.send_message(
                chat_id,
                format!(
                    "✅ {} added to your cart ({} pcs).\n\nUse /cart to review it.",
                    product.name, quantity
                ),
            )
            .await?;
        }
        Err(crate::utils::errors::BazarBotError::ProductNotFound { .. }) => {
            bot.send_message(chat_id, "⚠️ Sorry, this product is gone.").await?;
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
