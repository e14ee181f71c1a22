//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    DatabasePool, CartRepository, CategoryRepository, ChannelPostRepository,
    CustomerRepository, OrderRepository, ProductRepository,
};
use crate::models::*;
use crate::utils::errors::BazarBotError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub products: ProductRepository,
    pub categories: CategoryRepository,
    pub customers: CustomerRepository,
    pub orders: OrderRepository,
    pub carts: CartRepository,
    pub channel_posts: ChannelPostRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            customers: CustomerRepository::new(pool.clone()),
            orders: OrderRepository::new(pool.clone()),
            carts: CartRepository::new(pool.clone()),
            channel_posts: ChannelPostRepository::new(pool),
        }
    }

    /// Look up the customer for a Telegram user, creating a placeholder
    /// row on first contact. Contact details are filled in at checkout.
    pub async fn initialize_customer(&self, telegram_id: i64, display_name: Option<String>) -> Result<Customer, BazarBotError> {
        if let Some(existing) = self.customers.find_by_telegram_id(telegram_id).await? {
            return Ok(existing);
        }

        let request = CreateCustomerRequest {
            telegram_id,
            name: display_name.unwrap_or_else(|| "Unknown".to_string()),
            phone: CONTACT_NOT_PROVIDED.to_string(),
            address: CONTACT_NOT_PROVIDED.to_string(),
        };

        self.customers.create(request).await
    }

    /// Look up a category or create it by name (mirror bot and admin flow)
    pub async fn ensure_category(&self, name: &str) -> Result<Category, BazarBotError> {
        if let Some(existing) = self.categories.find_by_name(name).await? {
            return Ok(existing);
        }

        self.categories
            .create(CreateCategoryRequest {
                name: name.to_string(),
                description: None,
                image_url: None,
            })
            .await
    }

    /// System statistics for the admin panel
    pub async fn get_system_stats(&self) -> Result<serde_json::Value, BazarBotError> {
        let products = self.products.count().await?;
        let categories = self.categories.count().await?;
        let customers = self.customers.count().await?;
        let orders = self.orders.count().await?;
        let channel_posts = self.channel_posts.count().await?;

        Ok(serde_json::json!({
            "products": products,
            "categories": categories,
            "customers": customers,
            "orders": orders,
            "channel_posts": channel_posts,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_service_creation() {
        // This would require a test database setup
        // For now, just test that the service can be created
        let pool = sqlx::PgPool::connect("postgresql://test").await;
        if let Ok(pool) = pool {
            let service = DatabaseService::new(pool);
            let _ = &service.products;
            let _ = &service.orders;
        }
    }
}
