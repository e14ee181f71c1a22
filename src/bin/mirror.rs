//! BazarBot channel-mirror bot
//!
//! Watches the shop channel, mirrors product posts into a categorized
//! catalog and serves it to chat users. A background pruner keeps the
//! catalog inside the retention window.

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use tracing::{error, info, warn};

use BazarBot::{
    config::Settings,
    utils::logging,
    catalog::CatalogPruner,
    database::{DatabaseService, connection::{create_pool, DatabaseConfig}},
    services::ServiceFactory,
    handlers::channel,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting BazarBot channel mirror...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = DatabaseConfig::from_settings(&settings.database);
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // Initialize database service
    let database_service = DatabaseService::new(db_pool);

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(bot.clone(), settings.clone(), database_service.clone())?;

    // Start the catalog pruner
    let mut pruner = CatalogPruner::new(database_service.channel_posts.clone(), &settings.catalog);
    pruner.start();

    let services_arc = Arc::new(services);
    let settings_arc = Arc::new(settings);

    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![services_arc, settings_arc])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("BazarBot channel mirror is ready!");

    dispatcher.dispatch().await;

    pruner.stop();
    info!("BazarBot channel mirror has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            // Mirror posts from the shop channel
            Update::filter_channel_post().endpoint(handle_channel_posts),
        )
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<MirrorCommands>()
                        .endpoint(handle_commands),
                ),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

#[derive(TeloxideBotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Catalog commands")]
enum MirrorCommands {
    #[command(description = "Browse the catalog")]
    Start,
}

/// Handle channel posts: run the catalog pipeline
async fn handle_channel_posts(
    msg: Message,
    services: Arc<ServiceFactory>,
    settings: Arc<Settings>,
) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = channel::handle_channel_post(msg, services, settings.bot.channel_id).await {
        error!(error = %e, "Error handling channel post");
        return Err(e.into());
    }

    Ok(())
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: MirrorCommands,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let services = (*services).clone();

    let result = match cmd {
        MirrorCommands::Start => channel::handle_mirror_start(bot, msg, services).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = channel::handle_mirror_callback(bot, query, services).await {
        error!(error = %e, "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
