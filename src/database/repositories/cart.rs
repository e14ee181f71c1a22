//! Cart repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::cart::CartLine;
use crate::utils::errors::BazarBotError;

#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a product to the customer's cart. Adding a product that is
    /// already in the cart bumps its quantity.
    pub async fn add_item(&self, customer_id: i64, product_id: i64, quantity: i32) -> Result<(), BazarBotError> {
        sqlx::query(
            r#"
            INSERT INTO cart_items (customer_id, product_id, quantity, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (customer_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            "#
        )
        .bind(customer_id)
        .bind(product_id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Cart contents joined with live product data
    pub async fn get_lines(&self, customer_id: i64) -> Result<Vec<CartLine>, BazarBotError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT c.product_id, p.name AS product_name, p.price, c.quantity
            FROM cart_items c
            INNER JOIN products p ON p.id = c.product_id
            WHERE c.customer_id = $1
            ORDER BY c.created_at ASC
            "#
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Remove everything from the customer's cart
    pub async fn clear(&self, customer_id: i64) -> Result<u64, BazarBotError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Number of distinct products in the cart
    pub async fn count_items(&self, customer_id: i64) -> Result<i64, BazarBotError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM cart_items WHERE customer_id = $1"
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
