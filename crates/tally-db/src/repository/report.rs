//! # Report Repository
//!
//! Read-only aggregations over committed, active orders.
//!
//! ## Report Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  today() / sales_report(range)                                          │
//! │    └── SalesReport { total_revenue, total_transactions, best seller }   │
//! │                                                                         │
//! │  summary(range)                                                         │
//! │    └── SalesReport fields + category_breakdown (revenue DESC)           │
//! │                                                                         │
//! │  dashboard()                                                            │
//! │    └── today's figures + product / category / low-stock counts          │
//! │                                                                         │
//! │  Every report runs in ONE read transaction: all of its figures come    │
//! │  from the same committed snapshot (WAL), never from a half-applied     │
//! │  checkout or void.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Void orders are excluded everywhere. Dates are UTC calendar days of
//! `orders.created_at`, inclusive on both ends.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use tally_core::validation::parse_date_range;
use tally_core::{
    BestSellingProduct, CategoryRevenue, DashboardStats, DateRange, OrderStatus, ReportSummary,
    SalesReport, UNCATEGORIZED_ID, UNCATEGORIZED_NAME,
};

use crate::error::DbResult;

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
    low_stock_threshold: i64,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool, low_stock_threshold: i64) -> Self {
        ReportRepository {
            pool,
            low_stock_threshold,
        }
    }

    /// Revenue, transactions and best seller for the current UTC day.
    pub async fn today(&self) -> DbResult<SalesReport> {
        self.sales_report(today()).await
    }

    /// Revenue, transactions and best seller for an inclusive date range.
    pub async fn sales_report(&self, range: DateRange) -> DbResult<SalesReport> {
        debug!(start = %range.start, end = %range.end, "Building sales report");

        let mut tx = self.pool.begin().await?;
        let (total_revenue, total_transactions) = revenue(&mut *tx, range).await?;
        let best_selling_product = best_seller(&mut *tx, range).await?;
        tx.commit().await?;

        Ok(SalesReport {
            total_revenue,
            total_transactions,
            best_selling_product,
        })
    }

    /// Sales report plus per-category breakdown.
    pub async fn summary(&self, range: DateRange) -> DbResult<ReportSummary> {
        debug!(start = %range.start, end = %range.end, "Building report summary");

        let mut tx = self.pool.begin().await?;
        let (total_revenue, total_transactions) = revenue(&mut *tx, range).await?;
        let best_selling_product = best_seller(&mut *tx, range).await?;
        let category_breakdown = category_breakdown(&mut *tx, range).await?;
        tx.commit().await?;

        Ok(ReportSummary {
            total_revenue,
            total_transactions,
            best_selling_product,
            category_breakdown,
        })
    }

    /// [`summary`](Self::summary) for raw `YYYY-MM-DD` inputs.
    ///
    /// Both dates are required; a missing or malformed one is a validation
    /// error and no query runs.
    pub async fn summary_between(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> DbResult<ReportSummary> {
        let range = parse_date_range(start_date, end_date)?;
        self.summary(range).await
    }

    /// Snapshot for the admin dashboard.
    pub async fn dashboard(&self) -> DbResult<DashboardStats> {
        let day = today();

        let mut tx = self.pool.begin().await?;

        let (revenue_today, transactions_today) = revenue(&mut *tx, day).await?;

        let total_products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;

        let total_categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&mut *tx)
            .await?;

        let low_stock_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock < ?1")
                .bind(self.low_stock_threshold)
                .fetch_one(&mut *tx)
                .await?;

        let best_seller_today = best_seller(&mut *tx, day).await?;

        tx.commit().await?;

        debug!(
            revenue_today,
            transactions_today, low_stock_count, "Dashboard snapshot"
        );

        Ok(DashboardStats {
            revenue_today,
            transactions_today,
            total_products,
            total_categories,
            low_stock_count,
            best_seller_today,
        })
    }
}

fn today() -> DateRange {
    DateRange::single_day(Utc::now().date_naive())
}

/// `(sum(total_amount), count(*))` of active orders in the range.
async fn revenue(conn: &mut SqliteConnection, range: DateRange) -> DbResult<(i64, i64)> {
    let row: (i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
        FROM orders
        WHERE status = ?1
          AND date(created_at) BETWEEN ?2 AND ?3
        "#,
    )
    .bind(OrderStatus::Active.as_str())
    .bind(range.start)
    .bind(range.end)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

/// Product with the highest sold quantity; lowest product id wins a tie.
///
/// Uses the current product name, or the most recent line snapshot when the
/// product has been deleted.
async fn best_seller(
    conn: &mut SqliteConnection,
    range: DateRange,
) -> DbResult<Option<BestSellingProduct>> {
    let best = sqlx::query_as::<_, BestSellingProduct>(
        r#"
        SELECT d.product_id AS product_id,
               COALESCE(
                   p.name,
                   (SELECT s.product_name
                    FROM order_details s
                    WHERE s.product_id = d.product_id
                    ORDER BY s.id DESC
                    LIMIT 1)
               ) AS name,
               SUM(d.quantity) AS qty_sold
        FROM order_details d
        JOIN orders o ON o.id = d.order_id
        LEFT JOIN products p ON p.id = d.product_id
        WHERE o.status = ?1
          AND date(o.created_at) BETWEEN ?2 AND ?3
        GROUP BY d.product_id
        ORDER BY qty_sold DESC, d.product_id ASC
        LIMIT 1
        "#,
    )
    .bind(OrderStatus::Active.as_str())
    .bind(range.start)
    .bind(range.end)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(best)
}

/// Line revenue per category, revenue descending then category id.
async fn category_breakdown(
    conn: &mut SqliteConnection,
    range: DateRange,
) -> DbResult<Vec<CategoryRevenue>> {
    let rows = sqlx::query_as::<_, CategoryRevenue>(
        r#"
        SELECT COALESCE(c.id, ?4) AS category_id,
               COALESCE(c.name, ?5) AS category_name,
               SUM(d.subtotal) AS revenue,
               COUNT(DISTINCT o.id) AS transactions
        FROM order_details d
        JOIN orders o ON o.id = d.order_id
        LEFT JOIN products p ON p.id = d.product_id
        LEFT JOIN categories c ON c.id = p.category_id
        WHERE o.status = ?1
          AND date(o.created_at) BETWEEN ?2 AND ?3
        GROUP BY COALESCE(c.id, ?4)
        ORDER BY revenue DESC, category_id ASC
        "#,
    )
    .bind(OrderStatus::Active.as_str())
    .bind(range.start)
    .bind(range.end)
    .bind(UNCATEGORIZED_ID)
    .bind(UNCATEGORIZED_NAME)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

// =============================================================================
// Unit Tests
// =============================================================================
