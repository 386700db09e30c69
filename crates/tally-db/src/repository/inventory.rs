//! # Inventory Ledger
//!
//! Per-product stock with three primitives: read, bounded decrement and
//! increment.
//!
//! ## Atomicity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reserve(product, qty)                                                  │
//! │                                                                         │
//! │    UPDATE products                                                      │
//! │       SET stock = stock - qty                                           │
//! │     WHERE id = product AND stock >= qty      ← check + decrement in    │
//! │    RETURNING ...                               ONE statement            │
//! │         │                                                               │
//! │         ├── row returned  → reserved                                    │
//! │         └── no row        → SELECT: missing?  → ProductNotFound         │
//! │                                     too low?  → InsufficientStock       │
//! │                                                                         │
//! │  release(product, qty)                                                  │
//! │    UPDATE products SET stock = stock + qty WHERE id = product           │
//! │         ├── 1 row  → Restored                                           │
//! │         └── 0 rows → MissingProduct (caller decides)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger borrows a connection instead of owning a pool: it always runs
//! inside the caller's transaction, so a later failure in the same unit rolls
//! every stock change back.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use tally_core::{CoreError, StockLevel};

use crate::error::DbResult;

/// Outcome of giving stock back to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restock {
    /// Stock incremented; carries the new level.
    Restored { stock: i64 },
    /// The product row no longer exists. Nothing was written.
    MissingProduct,
}

/// Stock primitives bound to one open connection or transaction.
pub struct InventoryLedger<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> InventoryLedger<'c> {
    /// Wraps a connection, usually `&mut *tx`.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        InventoryLedger { conn }
    }

    /// Reads the current stock, name and price of a product.
    pub async fn read(&mut self, product_id: i64) -> DbResult<Option<StockLevel>> {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id AS product_id, name, price, stock
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(level)
    }

    /// Atomically takes `quantity` units out of stock.
    ///
    /// Returns the product's name and price together with the stock left
    /// after the decrement.
    ///
    /// ## Errors
    /// - `ProductNotFound` if the row does not exist
    /// - `InsufficientStock` if fewer than `quantity` units remain
    pub async fn reserve(
        &mut self,
        product_id: i64,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<StockLevel> {
        let reserved = sqlx::query_as::<_, StockLevel>(
            r#"
            UPDATE products
            SET stock = stock - ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            RETURNING id AS product_id, name, price, stock
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .fetch_optional(&mut *self.conn)
        .await?;

        if let Some(level) = reserved {
            debug!(
                product_id,
                quantity,
                remaining = level.stock,
                "Stock reserved"
            );
            return Ok(level);
        }

        // Same transaction, so this sees exactly the row the update rejected.
        let err = match self.read(product_id).await? {
            None => CoreError::ProductNotFound(product_id),
            Some(level) => CoreError::InsufficientStock {
                product_id,
                product_name: level.name,
                available: level.stock,
                requested: quantity,
            },
        };
        debug!(product_id, quantity, error = %err, "Reservation rejected");
        Err(err.into())
    }

    /// Atomically puts `quantity` units back into stock.
    pub async fn release(
        &mut self,
        product_id: i64,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<Restock> {
        let stock: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock = stock + ?2,
                updated_at = ?3
            WHERE id = ?1
            RETURNING stock
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(match stock {
            Some(stock) => {
                debug!(product_id, quantity, stock, "Stock released");
                Restock::Restored { stock }
            }
            None => Restock::MissingProduct,
        })
    }
}
