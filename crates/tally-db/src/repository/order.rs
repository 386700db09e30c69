//! # Order Repository
//!
//! The order engine: checkout, void and order history.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CHECKOUT (one transaction)                                          │
//! │     ├── validate request                 (no transaction yet)           │
//! │     ├── for each item: ledger.reserve()  (bounded decrement)            │
//! │     │     └── price line from the row the decrement returned            │
//! │     ├── clamp discount, settle total                                    │
//! │     ├── INSERT order header                                             │
//! │     ├── INSERT one line per item (name + price snapshot)                │
//! │     └── COMMIT  → Order { status: Active }                              │
//! │                                                                         │
//! │  2. (OPTIONAL) VOID (one transaction)                                   │
//! │     ├── UPDATE status active → void      (conditional, issued first)    │
//! │     ├── for each line: ledger.release()                                 │
//! │     └── COMMIT  → VoidReceipt                                           │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction: nothing is applied.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both units open with a write statement, so SQLite takes its write lock
//! before anything is read and concurrent writers queue on `busy_timeout`
//! instead of failing on a stale snapshot.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use tally_core::totals::TotalsAccumulator;
use tally_core::validation::{
    normalize_pagination, normalize_payment_method, validate_checkout, validate_order_id,
};
use tally_core::{
    CheckoutRequest, CoreError, DateRange, Money, Order, OrderDetail, OrderListItem, OrderStatus,
    PaginatedOrders, RestoredLine, VoidReceipt,
};

use crate::error::{DbError, DbResult};
use crate::repository::inventory::{InventoryLedger, Restock};

/// Repository for order operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

/// A reserved line waiting to be written.
struct StagedLine {
    product_id: i64,
    product_name: String,
    quantity: i64,
    unit_price: i64,
    subtotal: i64,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Runs a checkout as one atomic unit.
    ///
    /// ## Returns
    /// * `Ok(Order)` - committed order with ids, timestamp and line items
    /// * `Err(DbError::Core(Validation))` - rejected before storage access
    /// * `Err(DbError::Core(ProductNotFound | InsufficientStock))` - nothing applied
    /// * `Err(_)` storage fault - nothing applied
    ///
    /// The same product may appear on several lines; each line reserves its
    /// own quantity, so their sum is bounded by stock as a whole.
    pub async fn checkout(&self, req: CheckoutRequest) -> DbResult<Order> {
        validate_checkout(&req)?;
        let payment_method = normalize_payment_method(&req.payment_method);
        let now = Utc::now();

        debug!(lines = req.items.len(), "Starting checkout");

        let mut tx = self.pool.begin().await?;

        let mut totals = TotalsAccumulator::new();
        let mut staged = Vec::with_capacity(req.items.len());
        {
            let mut ledger = InventoryLedger::new(&mut *tx);
            for item in &req.items {
                let level = ledger.reserve(item.product_id, item.quantity, now).await?;
                let subtotal = totals.add_line(Money::from_minor(level.price), item.quantity)?;
                staged.push(StagedLine {
                    product_id: item.product_id,
                    product_name: level.name,
                    quantity: item.quantity,
                    unit_price: level.price,
                    subtotal: subtotal.minor(),
                });
            }
        }

        let totals = totals.finish(req.discount);

        let order_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (
                total_amount, payment_method, discount, notes, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            "#,
        )
        .bind(totals.total.minor())
        .bind(&payment_method)
        .bind(totals.discount.minor())
        .bind(&req.notes)
        .bind(OrderStatus::Active.as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let mut details = Vec::with_capacity(staged.len());
        for line in staged {
            let detail_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO order_details (
                    order_id, product_id, product_name, quantity, unit_price, subtotal
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                RETURNING id
                "#,
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.subtotal)
            .fetch_one(&mut *tx)
            .await?;

            details.push(OrderDetail {
                id: detail_id,
                order_id,
                product_id: line.product_id,
                product_name: line.product_name,
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.subtotal,
            });
        }

        tx.commit().await?;

        info!(
            order_id,
            total_amount = totals.total.minor(),
            discount = totals.discount.minor(),
            lines = details.len(),
            "Checkout committed"
        );

        Ok(Order {
            id: order_id,
            total_amount: totals.total.minor(),
            payment_method,
            discount: totals.discount.minor(),
            notes: req.notes,
            status: OrderStatus::Active,
            created_at: now,
            voided_at: None,
            details,
        })
    }

    /// Voids an active order and restores its stock as one atomic unit.
    ///
    /// ## Returns
    /// * `Ok(VoidReceipt)` - order is now void, stock restored
    /// * `Err(DbError::Core(OrderNotFound))` - no such order
    /// * `Err(DbError::Core(OrderAlreadyVoided))` - nothing changed
    ///
    /// A line whose product was deleted since the sale cannot be restocked;
    /// it is skipped, logged and listed in the receipt.
    pub async fn void(&self, order_id: i64) -> DbResult<VoidReceipt> {
        validate_order_id(order_id)?;
        let now = Utc::now();

        debug!(order_id, "Voiding order");

        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?2,
                voided_at = ?3
            WHERE id = ?1 AND status = ?4
            "#,
        )
        .bind(order_id)
        .bind(OrderStatus::Void.as_str())
        .bind(now)
        .bind(OrderStatus::Active.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if flipped == 0 {
            let current: Option<OrderStatus> =
                sqlx::query_scalar("SELECT status FROM orders WHERE id = ?1")
                    .bind(order_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let err: DbError = match current {
                None => CoreError::OrderNotFound(order_id).into(),
                Some(status) => match status.void(order_id) {
                    Err(e) => e.into(),
                    // The write lock is held, so an active order cannot miss
                    // the conditional update.
                    Ok(_) => DbError::TransactionFailed(format!(
                        "order {order_id} is active but was not voided"
                    )),
                },
            };
            debug!(order_id, error = %err, "Void rejected");
            return Err(err);
        }

        let lines: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT product_id, quantity
            FROM order_details
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut restored = Vec::with_capacity(lines.len());
        let mut skipped_product_ids = Vec::new();
        {
            let mut ledger = InventoryLedger::new(&mut *tx);
            for (product_id, quantity) in lines {
                match ledger.release(product_id, quantity, now).await? {
                    Restock::Restored { .. } => restored.push(RestoredLine {
                        product_id,
                        quantity,
                    }),
                    Restock::MissingProduct => {
                        warn!(
                            order_id,
                            product_id, quantity, "Product no longer exists, stock not restored"
                        );
                        skipped_product_ids.push(product_id);
                    }
                }
            }
        }

        tx.commit().await?;

        info!(
            order_id,
            restored = restored.len(),
            skipped = skipped_product_ids.len(),
            "Void committed"
        );

        Ok(VoidReceipt {
            order_id,
            voided_at: now,
            restored,
            skipped_product_ids,
        })
    }

    /// Gets an order with its line items.
    ///
    /// Voided orders are returned too; check `status`.
    pub async fn get_by_id(&self, order_id: i64) -> DbResult<Order> {
        validate_order_id(order_id)?;

        let mut tx = self.pool.begin().await?;

        let mut order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, total_amount, payment_method, discount, notes,
                   status, created_at, voided_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::OrderNotFound(order_id))?;

        order.details = sqlx::query_as::<_, OrderDetail>(
            r#"
            SELECT id, order_id, product_id, product_name, quantity, unit_price, subtotal
            FROM order_details
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// Lists orders newest first, voided ones included.
    ///
    /// `page` and `limit` are normalized (page ≥ 1, limit in 1..=100,
    /// default 20). `range` filters on the UTC calendar date of `created_at`.
    pub async fn list(
        &self,
        page: i64,
        limit: i64,
        range: Option<DateRange>,
    ) -> DbResult<PaginatedOrders> {
        let (page, limit) = normalize_pagination(page, limit);
        let offset = (page - 1).saturating_mul(limit);
        let start = range.map(|r| r.start);
        let end = range.map(|r| r.end);

        debug!(page, limit, ?range, "Listing orders");

        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM orders o
            WHERE ?1 IS NULL OR date(o.created_at) BETWEEN ?1 AND ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&mut *tx)
        .await?;

        let data = sqlx::query_as::<_, OrderListItem>(
            r#"
            SELECT o.id, o.total_amount, o.payment_method, o.discount, o.status,
                   (SELECT COUNT(*) FROM order_details d WHERE d.order_id = o.id) AS item_count,
                   o.created_at
            FROM orders o
            WHERE ?1 IS NULL OR date(o.created_at) BETWEEN ?1 AND ?2
            ORDER BY o.created_at DESC, o.id DESC
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PaginatedOrders {
            data,
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
