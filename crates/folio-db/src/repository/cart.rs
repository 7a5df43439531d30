//! # Cart Repository
//!
//! One row per `(user, book)`; `position` preserves insertion order.
//!
//! ```text
//! load(user)  ──► SELECT ... ORDER BY position      ──► Cart
//! save(cart)  ──► BEGIN; DELETE user rows; INSERT lines; COMMIT
//! clear(user) ──► DELETE user rows
//! ```
//!
//! `save` rewrites the whole cart. Carts are small (≤ 100 lines) and this
//! keeps positions dense without any renumbering logic.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use folio_core::{Cart, CartLine};

#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct CartLineRecord {
    book_id: String,
    quantity: i64,
}

impl CartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// The user's cart; empty if they never added anything.
    pub async fn load(&self, user_id: &str) -> DbResult<Cart> {
        let records = sqlx::query_as::<_, CartLineRecord>(
            r#"
            SELECT book_id, quantity
            FROM cart_items
            WHERE user_id = ?1
            ORDER BY position
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Cart {
            user_id: user_id.to_string(),
            lines: records
                .into_iter()
                .map(|r| CartLine {
                    book_id: r.book_id,
                    quantity: r.quantity,
                })
                .collect(),
        })
    }

    /// Replaces the stored cart with `cart`, atomically.
    pub async fn save(&self, cart: &Cart) -> DbResult<()> {
        debug!(user_id = %cart.user_id, lines = cart.lines.len(), "Saving cart");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(&cart.user_id)
            .execute(&mut *tx)
            .await?;

        for (position, line) in cart.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_items (user_id, book_id, quantity, position)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&cart.user_id)
            .bind(&line.book_id)
            .bind(line.quantity)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn clear(&self, user_id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
