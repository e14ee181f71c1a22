//! Product repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::product::{Product, CreateProductRequest, UpdateProductRequest};
use crate::utils::errors::BazarBotError;

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new product
    pub async fn create(&self, request: CreateProductRequest) -> Result<Product, BazarBotError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, image_url, category_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, price, image_url, is_available, category_id, created_at, updated_at
            "#
        )
        .bind(request.name)
        .bind(request.description)
        .bind(request.price)
        .bind(request.image_url)
        .bind(request.category_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    /// Find product by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Product>, BazarBotError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, image_url, is_available, category_id, created_at, updated_at FROM products WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Update product fields that are set in the request
    pub async fn update(&self, id: i64, request: UpdateProductRequest) -> Result<Product, BazarBotError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                image_url = COALESCE($5, image_url),
                is_available = COALESCE($6, is_available),
                category_id = COALESCE($7, category_id),
                updated_at = $8
            WHERE id = $1
            RETURNING id, name, description, price, image_url, is_available, category_id, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.price)
        .bind(request.image_url)
        .bind(request.is_available)
        .bind(request.category_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(BazarBotError::ProductNotFound { product_id: id })?;

        Ok(product)
    }

    /// Delete product. Cart lines referencing it are removed by the
    /// cascade; order items keep their price snapshots.
    pub async fn delete(&self, id: i64) -> Result<(), BazarBotError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BazarBotError::ProductNotFound { product_id: id });
        }

        Ok(())
    }

    /// List all products, newest first (admin view)
    pub async fn list_all(&self) -> Result<Vec<Product>, BazarBotError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, image_url, is_available, category_id, created_at, updated_at FROM products ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// List available products in a category (customer view)
    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<Product>, BazarBotError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, image_url, is_available, category_id, created_at, updated_at FROM products WHERE category_id = $1 AND is_available = true ORDER BY created_at DESC"
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Count total products
    pub async fn count(&self) -> Result<i64, BazarBotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_product_repository_creation() {
        // This would require a test database setup
        // For now, just test that the repository can be created
        let pool = PgPool::connect("postgresql://test").await;
        if let Ok(pool) = pool {
            let repo = ProductRepository::new(pool);
            assert!(!repo.pool.is_closed());
        }
    }
}
