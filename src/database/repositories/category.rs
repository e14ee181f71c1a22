//! Category repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::category::{Category, CreateCategoryRequest};
use crate::utils::errors::BazarBotError;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new category
    pub async fn create(&self, request: CreateCategoryRequest) -> Result<Category, BazarBotError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, image_url, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, image_url, created_at
            "#
        )
        .bind(request.name)
        .bind(request.description)
        .bind(request.image_url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Find category by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Category>, BazarBotError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, image_url, created_at FROM categories WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Find category by name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>, BazarBotError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, image_url, created_at FROM categories WHERE name = $1"
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// List all categories
    pub async fn list(&self) -> Result<Vec<Category>, BazarBotError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, image_url, created_at FROM categories ORDER BY name ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Count total categories
    pub async fn count(&self) -> Result<i64, BazarBotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
