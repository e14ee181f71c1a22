//! Cart models

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartItem {
    pub id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Cart line joined with live product data, for display and checkout
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartLine {
    pub product_id: i64,
    pub product_name: String,
    pub price: i64,
    pub quantity: i32,
}

impl CartLine {
    pub fn subtotal(&self) -> i64 {
        self.price * self.quantity as i64
    }
}

/// Total over a set of cart lines
pub fn cart_total(lines: &[CartLine]) -> i64 {
    lines.iter().map(CartLine::subtotal).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, price: i64, quantity: i32) -> CartLine {
        CartLine {
            product_id,
            product_name: format!("product-{}", product_id),
            price,
            quantity,
        }
    }

    #[test]
    fn test_cart_total() {
        let lines = vec![line(1, 100, 2), line(2, 250, 1)];
        assert_eq!(cart_total(&lines), 450);
    }

    #[test]
    fn test_empty_cart_total() {
        assert_eq!(cart_total(&[]), 0);
    }
}
