//! Order service implementation
//!
//! Checkout and order history on top of the order repository.

use tracing::info;
use crate::database::DatabaseService;
use crate::models::customer::{Customer, UpdateCustomerRequest};
use crate::models::order::{Order, OrderLine, OrderStatus};
use crate::utils::errors::{BazarBotError, Result};

/// A placed order together with its lines, ready for display
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
}

impl PlacedOrder {
    pub fn total(&self) -> i64 {
        self.lines.iter().map(OrderLine::subtotal).sum()
    }
}

/// Order operations for shop customers and admins
#[derive(Debug, Clone)]
pub struct OrderService {
    database: DatabaseService,
}

impl OrderService {
    pub fn new(database: DatabaseService) -> Self {
        Self { database }
    }

    /// Finalize checkout: store the confirmed contact details on the
    /// customer, then turn the cart into an order in one transaction.
    pub async fn place_order(
        &self,
        telegram_id: i64,
        name: String,
        phone: String,
        address: String,
    ) -> Result<PlacedOrder> {
        let customer = self
            .database
            .customers
            .find_by_telegram_id(telegram_id)
            .await?
            .ok_or(BazarBotError::CustomerNotFound { telegram_id })?;

        let customer = self
            .database
            .customers
            .update(
                customer.id,
                UpdateCustomerRequest {
                    name: Some(name),
                    phone: Some(phone),
                    address: Some(address),
                },
            )
            .await?;

        let (order, lines) = self
            .database
            .orders
            .checkout(customer.id, Some("Telegram bot order".to_string()))
            .await?;

        info!(
            telegram_id = telegram_id,
            order_id = order.id,
            lines = lines.len(),
            "Order placed"
        );

        Ok(PlacedOrder {
            order,
            customer,
            lines,
        })
    }

    /// Past orders of a customer with their totals, newest first
    pub async fn order_history(&self, telegram_id: i64) -> Result<Vec<(Order, i64)>> {
        let Some(customer) = self.database.customers.find_by_telegram_id(telegram_id).await? else {
            return Ok(Vec::new());
        };

        let orders = self.database.orders.list_for_customer(customer.id).await?;

        let mut history = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.database.orders.get_items(order.id).await?;
            let total = items.iter().map(|item| item.subtotal()).sum();
            history.push((order, total));
        }

        Ok(history)
    }

    /// Admin view of an order with its lines
    pub async fn order_details(&self, order_id: i64) -> Result<(Order, Vec<OrderLine>)> {
        let order = self
            .database
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(BazarBotError::OrderNotFound { order_id })?;

        let lines = self.database.orders.get_lines(order_id).await?;
        Ok((order, lines))
    }

    /// Admin: advance an order to a new status
    pub async fn set_status(&self, order_id: i64, status: OrderStatus) -> Result<Order> {
        let order = self.database.orders.update_status(order_id, status).await?;
        info!(order_id = order_id, status = %status, "Order status updated");
        Ok(order)
    }

    /// Admin: most recent orders
    pub async fn recent_orders(&self, limit: i64) -> Result<Vec<Order>> {
        self.database.orders.list_recent(limit).await
    }
}
