//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod notification;
pub mod order;

// Re-export commonly used services
pub use auth::AuthService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use notification::NotificationService;
pub use order::{OrderService, PlacedOrder};

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;
use teloxide::Bot;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub database: DatabaseService,
    pub auth_service: AuthService,
    pub cart_service: CartService,
    pub order_service: OrderService,
    pub catalog_service: CatalogService,
    pub notification_service: NotificationService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(bot: Bot, settings: Settings, database: DatabaseService) -> Result<Self> {
        let auth_service = AuthService::new(&settings);
        let cart_service = CartService::new(database.clone());
        let order_service = OrderService::new(database.clone());
        let catalog_service = CatalogService::new(database.channel_posts.clone(), &settings.catalog);
        let notification_service = NotificationService::new(bot, &settings);

        Ok(Self {
            database,
            auth_service,
            cart_service,
            order_service,
            catalog_service,
            notification_service,
        })
    }
}
