//! # Order Repository
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. COMMIT (checkout)                                                   │
//! │     └── insert_and_clear_cart()                                         │
//! │           BEGIN                                                         │
//! │             INSERT orders         (status = pending)                    │
//! │             INSERT order_items    (unit prices frozen)                  │
//! │             DELETE cart_items     (owner's cart)                        │
//! │           COMMIT   ── all three or none                                 │
//! │                                                                         │
//! │  2. READ                                                                │
//! │     └── get_by_id() / list_for_user() / list_all()                      │
//! │                                                                         │
//! │  3. FULFILLMENT                                                         │
//! │     └── transition_status()  ── only status + updated_at may change     │
//! │                                                                         │
//! │  Orders are never deleted; triggers reject item/total rewrites.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};
use folio_core::{Order, OrderLine, OrderStatus};

#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRecord {
    id: String,
    user_id: String,
    total_cents: i64,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRecord {
    order_id: String,
    book_id: String,
    quantity: i64,
    unit_price_cents: i64,
}

impl OrderRecord {
    fn into_order(self, items: Vec<OrderLine>) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            items,
            total_cents: self.total_cents,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, total_cents, status, created_at, updated_at";

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists `order` and empties its owner's cart in one transaction.
    ///
    /// On any error nothing is written: no order row, no item rows, and the
    /// cart is exactly as it was.
    pub async fn insert_and_clear_cart(&self, order: &Order) -> DbResult<()> {
        debug!(order_id = %order.id, user_id = %order.user_id, "Committing order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, total_cents, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.total_cents)
        .bind(order.status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, position, book_id, quantity, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&order.id)
            .bind(position as i64)
            .bind(&item.book_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(&order.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let record = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(record) = record else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRecord>(
            r#"
            SELECT order_id, book_id, quantity, unit_price_cents
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(record.into_order(items.into_iter().map(to_line).collect())))
    }

    /// A user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let records = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, OrderItemRecord>(
            r#"
            SELECT oi.order_id, oi.book_id, oi.quantity, oi.unit_price_cents
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE o.user_id = ?1
            ORDER BY oi.order_id, oi.position
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble(records, items))
    }

    /// Every order, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let records = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, OrderItemRecord>(
            r#"
            SELECT order_id, book_id, quantity, unit_price_cents
            FROM order_items
            ORDER BY order_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble(records, items))
    }

    /// Moves an order from `from` to `to`.
    ///
    /// The `from` guard makes concurrent transitions safe: if someone else
    /// changed the status first, no row matches and this reports
    /// `NotFound` for "Order (<from>)".
    pub async fn transition_status(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE orders SET status = ?3, updated_at = ?4 WHERE id = ?1 AND status = ?2",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(format!("Order ({from})"), id));
        }

        debug!(order_id = %id, %from, %to, "Order status updated");
        Ok(())
    }

    /// `(revenue_cents, order_count)` over orders that still count as sales.
    pub async fn sales_summary(&self) -> DbResult<(i64, i64)> {
        let (revenue, count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_cents), 0), COUNT(*)
            FROM orders
            WHERE status != 'cancelled'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((revenue, count))
    }
}

fn to_line(r: OrderItemRecord) -> OrderLine {
    OrderLine {
        book_id: r.book_id,
        quantity: r.quantity,
        unit_price_cents: r.unit_price_cents,
    }
}

/// Zips order rows with their item rows, keeping the order-row ordering.
fn assemble(records: Vec<OrderRecord>, items: Vec<OrderItemRecord>) -> Vec<Order> {
    let mut by_order: HashMap<String, Vec<OrderLine>> = HashMap::new();
    for item in items {
        by_order
            .entry(item.order_id.clone())
            .or_default()
            .push(to_line(item));
    }

    records
        .into_iter()
        .map(|r| {
            let lines = by_order.remove(&r.id).unwrap_or_default();
            r.into_order(lines)
        })
        .collect()
}
