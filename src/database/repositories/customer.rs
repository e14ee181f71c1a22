//! Customer repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::customer::{Customer, CreateCustomerRequest, UpdateCustomerRequest};
use crate::utils::errors::BazarBotError;

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new customer
    pub async fn create(&self, request: CreateCustomerRequest) -> Result<Customer, BazarBotError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (telegram_id, name, phone, address, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, telegram_id, name, phone, address, created_at
            "#
        )
        .bind(request.telegram_id)
        .bind(request.name)
        .bind(request.phone)
        .bind(request.address)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Find customer by Telegram user ID
    pub async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<Customer>, BazarBotError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, telegram_id, name, phone, address, created_at FROM customers WHERE telegram_id = $1"
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Update customer contact details
    pub async fn update(&self, id: i64, request: UpdateCustomerRequest) -> Result<Customer, BazarBotError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address)
            WHERE id = $1
            RETURNING id, telegram_id, name, phone, address, created_at
            "#
        )
        .bind(id)
        .bind(request.name)
        .bind(request.phone)
        .bind(request.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Count total customers
    pub async fn count(&self) -> Result<i64, BazarBotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
