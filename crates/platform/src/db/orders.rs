//! Order repository.
//!
//! Orders denormalize their line items into a jsonb column at purchase time,
//! so later catalog edits never alter historical orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use storelane_core::{OrderId, OrderStatus, ProductId, StoreId};

use super::RepositoryError;

/// One denormalized line item, captured at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderLine {
    /// Line total (price × quantity).
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A customer order.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub items: JsonValue,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Decode the denormalized line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the jsonb payload does
    /// not match the line-item shape.
    pub fn lines(&self) -> Result<Vec<OrderLine>, RepositoryError> {
        serde_json::from_value(self.items.clone())
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid order items: {e}")))
    }
}

/// Parameters for creating an order.
#[derive(Debug)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub lines: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

/// Insert an order with its denormalized line items.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn create_order(
    pool: &PgPool,
    store_id: StoreId,
    params: NewOrder,
) -> Result<Order, RepositoryError> {
    let items = serde_json::to_value(&params.lines)
        .map_err(|e| RepositoryError::DataCorruption(format!("unencodable order items: {e}")))?;

    let order = sqlx::query_as::<_, Order>(
        r"
        INSERT INTO orders (store_id, customer_name, customer_phone, customer_address,
                            items, subtotal, delivery_fee, total)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, store_id, customer_name, customer_phone, customer_address,
                  items, subtotal, delivery_fee, total, status, created_at
        ",
    )
    .bind(store_id)
    .bind(&params.customer_name)
    .bind(&params.customer_phone)
    .bind(&params.customer_address)
    .bind(&items)
    .bind(params.subtotal)
    .bind(params.delivery_fee)
    .bind(params.total)
    .fetch_one(pool)
    .await?;

    Ok(order)
}

/// List a store's orders, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_orders(pool: &PgPool, store_id: StoreId) -> Result<Vec<Order>, RepositoryError> {
    let orders = sqlx::query_as::<_, Order>(
        r"
        SELECT id, store_id, customer_name, customer_phone, customer_address,
               items, subtotal, delivery_fee, total, status, created_at
        FROM orders
        WHERE store_id = $1
        ORDER BY created_at DESC
        ",
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

/// Fetch one order scoped to a store.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_order(
    pool: &PgPool,
    store_id: StoreId,
    order_id: OrderId,
) -> Result<Option<Order>, RepositoryError> {
    let order = sqlx::query_as::<_, Order>(
        r"
        SELECT id, store_id, customer_name, customer_phone, customer_address,
               items, subtotal, delivery_fee, total, status, created_at
        FROM orders
        WHERE id = $2 AND store_id = $1
        ",
    )
    .bind(store_id)
    .bind(order_id)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

/// Move an order's fulfillment status.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the order is not in this store.
pub async fn update_status(
    pool: &PgPool,
    store_id: StoreId,
    order_id: OrderId,
    status: OrderStatus,
) -> Result<Order, RepositoryError> {
    sqlx::query_as::<_, Order>(
        r"
        UPDATE orders
        SET status = $3
        WHERE id = $2 AND store_id = $1
        RETURNING id, store_id, customer_name, customer_phone, customer_address,
                  items, subtotal, delivery_fee, total, status, created_at
        ",
    )
    .bind(store_id)
    .bind(order_id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_line_total() {
        let line = OrderLine {
            product_id: ProductId::new(1),
            name: "Espresso beans".to_string(),
            price: Decimal::new(1250, 2),
            quantity: 3,
        };
        assert_eq!(line.total(), Decimal::new(3750, 2));
    }

    #[test]
    fn test_order_lines_roundtrip() {
        let lines = vec![
            OrderLine {
                product_id: ProductId::new(1),
                name: "Filter".to_string(),
                price: Decimal::new(500, 2),
                quantity: 2,
            },
            OrderLine {
                product_id: ProductId::new(2),
                name: "Mug".to_string(),
                price: Decimal::new(899, 2),
                quantity: 1,
            },
        ];

        let items = serde_json::to_value(&lines).expect("encode");
        let decoded: Vec<OrderLine> = serde_json::from_value(items).expect("decode");
        assert_eq!(decoded, lines);
    }

    fn order_with_items(items: JsonValue) -> Order {
        Order {
            id: OrderId::new(1),
            store_id: StoreId::new(1),
            customer_name: "Dana".to_string(),
            customer_phone: "15551234567".to_string(),
            customer_address: None,
            items,
            subtotal: Decimal::new(500, 2),
            delivery_fee: Decimal::ZERO,
            total: Decimal::new(500, 2),
            status: OrderStatus::Received,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_order_decodes_stored_lines() {
        let lines = vec![OrderLine {
            product_id: ProductId::new(1),
            name: "Filter".to_string(),
            price: Decimal::new(500, 2),
            quantity: 1,
        }];
        let order = order_with_items(serde_json::to_value(&lines).expect("encode"));
        assert_eq!(order.lines().expect("decode"), lines);
    }

    #[test]
    fn test_order_flags_corrupt_lines() {
        let order = order_with_items(serde_json::json!({"not": "line items"}));
        let err = order.lines().expect_err("corrupt payload");
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
