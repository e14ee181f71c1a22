//! Cart service implementation
//!
//! Business logic around the per-customer shopping cart.

use tracing::{debug, info};
use crate::database::DatabaseService;
use crate::models::cart::CartLine;
use crate::models::product::Product;
use crate::utils::errors::{BazarBotError, Result};

/// Cart operations for shop customers
#[derive(Debug, Clone)]
pub struct CartService {
    database: DatabaseService,
}

impl CartService {
    pub fn new(database: DatabaseService) -> Self {
        Self { database }
    }

    /// Add a product to the user's cart, creating the customer row on
    /// first contact. Fails when the product does not exist or is hidden.
    pub async fn add_to_cart(
        &self,
        telegram_id: i64,
        display_name: Option<String>,
        product_id: i64,
        quantity: i32,
    ) -> Result<Product> {
        if quantity <= 0 {
            return Err(BazarBotError::InvalidInput(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let product = self
            .database
            .products
            .find_by_id(product_id)
            .await?
            .filter(|p| p.is_available)
            .ok_or(BazarBotError::ProductNotFound { product_id })?;

        let customer = self
            .database
            .initialize_customer(telegram_id, display_name)
            .await?;

        self.database
            .carts
            .add_item(customer.id, product_id, quantity)
            .await?;

        info!(
            telegram_id = telegram_id,
            product_id = product_id,
            quantity = quantity,
            "Product added to cart"
        );

        Ok(product)
    }

    /// Current cart contents for a Telegram user
    pub async fn view_cart(&self, telegram_id: i64) -> Result<Vec<CartLine>> {
        let Some(customer) = self.database.customers.find_by_telegram_id(telegram_id).await? else {
            return Ok(Vec::new());
        };

        self.database.carts.get_lines(customer.id).await
    }

    /// Empty the user's cart. Returns the number of removed lines.
    pub async fn clear_cart(&self, telegram_id: i64) -> Result<u64> {
        let Some(customer) = self.database.customers.find_by_telegram_id(telegram_id).await? else {
            return Ok(0);
        };

        let removed = self.database.carts.clear(customer.id).await?;
        debug!(telegram_id = telegram_id, removed = removed, "Cart cleared");
        Ok(removed)
    }
}
