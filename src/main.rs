//! BazarBot shop-management bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use tracing::{error, info, warn};

use BazarBot::{
    config::Settings,
    utils::logging,
    database::{DatabaseService, connection::{create_pool, DatabaseConfig}},
    services::ServiceFactory,
    state::{ScenarioManager, StateStorage},
    handlers::{
        commands::{start, help, catalog, cart, orders, admin},
        callbacks::handle_callback_query,
        messages::handle_message,
    },
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

    info!("Starting BazarBot shop bot...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = DatabaseConfig::from_settings(&settings.database);
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // Initialize database service
    let database_service = DatabaseService::new(db_pool);

    // Initialize state management
    let state_storage = StateStorage::new(settings.redis.clone()).await?;
    let scenario_manager = ScenarioManager::new();

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(bot.clone(), settings.clone(), database_service)?;

    info!("Setting up bot handlers...");

    let services_arc = Arc::new(services);
    let scenario_manager_arc = Arc::new(scenario_manager);
    let state_storage_arc = Arc::new(state_storage);

    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![
            services_arc,
            scenario_manager_arc,
            state_storage_arc
        ])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("BazarBot shop bot is ready!");

    dispatcher.dispatch().await;

    info!("BazarBot shop bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    // Handle commands
                    dptree::entry()
                        .filter_command::<BotCommands>()
                        .endpoint(handle_commands),
                )
                .branch(
                    // Handle regular messages
                    dptree::endpoint(handle_messages),
                ),
        )
        .branch(
            // Handle callback queries
            Update::filter_callback_query().endpoint(handle_callbacks),
        )
}

#[derive(TeloxideBotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "BazarBot shop commands")]
enum BotCommands {
    #[command(description = "Start the bot and show the main menu")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Browse products by category")]
    Catalog,
    #[command(description = "View your cart")]
    Cart,
    #[command(description = "Your order history")]
    Orders,
    #[command(description = "Admin panel (admin only)")]
    Admin,
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: BotCommands,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let services = (*services).clone();

    let result = match cmd {
        BotCommands::Start => start::handle_start(bot, msg, services).await,
        BotCommands::Help => help::handle_help(bot, msg).await,
        BotCommands::Catalog => catalog::handle_catalog(bot, msg, services).await,
        BotCommands::Cart => cart::handle_cart(bot, msg, services).await,
        BotCommands::Orders => orders::handle_orders(bot, msg, services).await,
        BotCommands::Admin => admin::handle_admin_panel(bot, msg, services).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    scenario_manager: Arc<ScenarioManager>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    let services = (*services).clone();
    let scenario_manager = (*scenario_manager).clone();
    let state_storage = (*state_storage).clone();

    if let Err(e) = handle_message(bot, msg, services, scenario_manager, state_storage).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    services: Arc<ServiceFactory>,
    scenario_manager: Arc<ScenarioManager>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    let services = (*services).clone();
    let scenario_manager = (*scenario_manager).clone();
    let state_storage = (*state_storage).clone();

    if let Err(e) = handle_callback_query(bot, query, services, scenario_manager, state_storage).await {
        error!(error = %e, "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
