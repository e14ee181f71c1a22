//! Channel mirror handlers
//!
//! Ingests posts from the shop channel into the mirrored catalog and
//! serves the category browser of the mirror bot.

use teloxide::{Bot, types::{CallbackQuery, ChatId, InlineKeyboardMarkup, InlineKeyboardButton, InputFile, Message}, prelude::*};
use tracing::{debug, info, warn};
use crate::utils::errors::Result;
use crate::utils::helpers::truncate_text;
use crate::services::ServiceFactory;

/// Handle a new channel post: run it through the catalog pipeline.
/// Posts from other channels than the configured one are ignored.
pub async fn handle_channel_post(
    msg: Message,
    services: ServiceFactory,
    watched_channel: Option<i64>,
) -> Result<()> {
    let channel_id = msg.chat.id.0;

    if let Some(watched) = watched_channel {
        if channel_id != watched {
            debug!(channel_id = channel_id, "Ignoring post from unwatched channel");
            return Ok(());
        }
    }

    let Some(text) = msg.caption().or_else(|| msg.text()) else {
        debug!(channel_id = channel_id, message_id = msg.id.0, "Channel post has no text, skipping");
        return Ok(());
    };

    let image_file_id = msg
        .photo()
        .and_then(|sizes| sizes.last())
        .map(|photo| photo.file.id.clone());

    let stored = services
        .catalog_service
        .ingest(channel_id, msg.id.0 as i64, text, image_file_id)
        .await?;

    if let Some(post) = stored {
        info!(
            channel_id = channel_id,
            message_id = post.message_id,
            category = %post.category,
            "Mirrored channel post"
        );
    }

    Ok(())
}

/// /start for the mirror bot: show the catalog categories
pub async fn handle_mirror_start(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    show_mirror_categories(bot, msg.chat.id, &services).await
}

/// Category keyboard built from what is currently in the catalog
pub async fn show_mirror_categories(bot: Bot, chat_id: ChatId, services: &ServiceFactory) -> Result<()> {
    let categories = services.catalog_service.categories().await?;

    if categories.is_empty() {
        bot.send_message(chat_id, "The catalog is empty for now, come back later!").await?;
        return Ok(());
    }

    let rows: Vec<Vec<InlineKeyboardButton>> = categories
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|name| InlineKeyboardButton::callback(name.clone(), format!("mcat:{}", name)))
                .collect()
        })
        .collect();

    bot.send_message(chat_id, "Choose a category:")
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;

    Ok(())
}

/// Mirror bot callbacks: a category button sends its products
pub async fn handle_mirror_callback(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    let Some(data) = query.data else {
        return Ok(());
    };

    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }

    let Some(category) = data.strip_prefix("mcat:") else {
        warn!(data = %data, "Unknown mirror callback");
        return Ok(());
    };

    // The back button carries an empty category name
    if category.is_empty() {
        return show_mirror_categories(bot, chat_id, &services).await;
    }

    let posts = services.catalog_service.products_in(category).await?;

    if posts.is_empty() {
        bot.send_message(chat_id, format!("Nothing in {} right now.", category)).await?;
        return show_mirror_categories(bot, chat_id, &services).await;
    }

    debug!(user_id = user_id, category = %category, count = posts.len(), "Sending category listing");

    for post in &posts {
        let caption = format!("{}\n\n💰 {}", post.caption, post.formatted_price());

        match &post.image_file_id {
            Some(file_id) => {
                bot.send_photo(chat_id, InputFile::file_id(file_id.clone()))
                    .caption(truncate_text(&caption, 1024))
                    .await?;
            }
            None => {
                bot.send_message(chat_id, caption).await?;
            }
        }
    }

    let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "⬅️ Back to categories",
        "mcat:",
    )]]);

    bot.send_message(chat_id, format!("That is all of {} for now.", category))
        .reply_markup(keyboard)
        .await?;

    Ok(())
}
