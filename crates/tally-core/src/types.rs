//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │   OrderDetail   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄┐ │  id             │◄──│  order_id (FK)  │       │
//! │  │  name           │ │ │  total_amount   │   │  product_id ────┼─┐     │
//! │  │  price          │ │ │  discount       │   │  product_name   │ │     │
//! │  │  stock (>= 0)   │ │ │  status         │   │  unit_price     │ │     │
//! │  └─────────────────┘ │ └─────────────────┘   └─────────────────┘ │     │
//! │                      └──────── weak reference (may dangle) ──────┘     │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  OrderStatus    │   │  SalesReport    │   │ DashboardStats  │       │
//! │  │  Active ──► Void│   │  ReportSummary  │   │                 │       │
//! │  │  (terminal)     │   │  CategoryRevenue│   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Line items freeze the product name and unit price at sale time, so order
//! history and reports survive later price edits or product deletion.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Catalog (boundary types)
// =============================================================================

/// A product category. Owned by the catalog subsystem; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for creating a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name; copied onto every line item at sale time.
    pub name: String,

    /// Unit price in minor units.
    pub price: i64,

    /// Units available for sale. Never negative.
    pub stock: i64,

    /// Owning category, if any. Cleared when the category is deleted.
    pub category_id: Option<i64>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price)
    }

    /// Checks if `quantity` units could be sold right now.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && self.stock >= quantity
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Ledger view of one product row: what checkout needs to price a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockLevel {
    pub product_id: i64,
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle of an order.
///
/// ```text
///   checkout ──► Active ──void──► Void   (terminal; never deleted)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Committed sale; counted by every report.
    #[default]
    Active,
    /// Reversed sale; stock restored, excluded from reports.
    Void,
}

impl OrderStatus {
    /// Persisted representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "active",
            OrderStatus::Void => "void",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Void)
    }

    /// Applies the void transition.
    ///
    /// `Active` becomes `Void`; voiding a `Void` order is a conflict.
    pub fn void(self, order_id: i64) -> CoreResult<OrderStatus> {
        match self {
            OrderStatus::Active => Ok(OrderStatus::Void),
            OrderStatus::Void => Err(CoreError::OrderAlreadyVoided(order_id)),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A committed checkout with its line items.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: i64,
    /// `sum(details.subtotal) - discount`.
    pub total_amount: i64,
    pub payment_method: String,
    /// Discount actually applied, within `[0, sum(details.subtotal)]`.
    pub discount: i64,
    pub notes: String,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voided_at: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub details: Vec<OrderDetail>,
}

impl Order {
    /// Sum of line subtotals before discount.
    pub fn gross_amount(&self) -> i64 {
        self.details.iter().map(|d| d.subtotal).sum()
    }

    /// Checks `total_amount == gross - discount` and `0 <= discount <= gross`.
    pub fn is_reconciled(&self) -> bool {
        let gross = self.gross_amount();
        self.discount >= 0 && self.discount <= gross && self.total_amount == gross - self.discount
    }
}

/// A line item. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderDetail {
    pub id: i64,
    pub order_id: i64,
    /// Weak reference; the product may have been deleted since.
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    pub unit_price: i64,
    /// `quantity × unit_price`.
    pub subtotal: i64,
}

// =============================================================================
// Checkout Input
// =============================================================================

/// One requested line of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl CheckoutItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        CheckoutItem {
            product_id,
            quantity,
        }
    }
}

/// Inbound checkout payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub discount: i64,
    #[serde(default)]
    pub notes: String,
}

impl CheckoutRequest {
    /// Request with default payment method, no discount and no notes.
    pub fn new(items: Vec<CheckoutItem>) -> Self {
        CheckoutRequest {
            items,
            ..Default::default()
        }
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn with_discount(mut self, discount: i64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

// =============================================================================
// Void Outcome
// =============================================================================

/// Stock given back for one line during a void.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RestoredLine {
    pub product_id: i64,
    pub quantity: i64,
}

/// Result of a successful void.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VoidReceipt {
    pub order_id: i64,
    #[ts(as = "String")]
    pub voided_at: DateTime<Utc>,
    pub restored: Vec<RestoredLine>,
    /// Products referenced by the order that no longer exist; their stock
    /// could not be restored.
    pub skipped_product_ids: Vec<i64>,
}

// =============================================================================
// Order History
// =============================================================================

/// Order summary row for history listings.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderListItem {
    pub id: i64,
    pub total_amount: i64,
    pub payment_method: String,
    pub discount: i64,
    pub status: OrderStatus,
    pub item_count: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// One page of order history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaginatedOrders {
    pub data: Vec<OrderListItem>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

// =============================================================================
// Reports
// =============================================================================

/// Inclusive range of calendar dates (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Range covering a single day.
    pub fn single_day(day: NaiveDate) -> Self {
        DateRange {
            start: day,
            end: day,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Product with the highest sold quantity in a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BestSellingProduct {
    pub product_id: i64,
    pub name: String,
    pub qty_sold: i64,
}

/// Revenue, transaction count and best seller for a window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub total_revenue: i64,
    pub total_transactions: i64,
    pub best_selling_product: Option<BestSellingProduct>,
}

/// Revenue attributed to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CategoryRevenue {
    pub category_id: i64,
    pub category_name: String,
    /// Sum of line subtotals (before order-level discount).
    pub revenue: i64,
    /// Distinct orders contributing to this category.
    pub transactions: i64,
}

/// Sales report plus per-category breakdown, sorted by revenue descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportSummary {
    pub total_revenue: i64,
    pub total_transactions: i64,
    pub best_selling_product: Option<BestSellingProduct>,
    pub category_breakdown: Vec<CategoryRevenue>,
}

/// Snapshot for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub revenue_today: i64,
    pub transactions_today: i64,
    pub total_products: i64,
    pub total_categories: i64,
    pub low_stock_count: i64,
    pub best_seller_today: Option<BestSellingProduct>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(subtotal: i64) -> OrderDetail {
        OrderDetail {
            id: 1,
            order_id: 1,
            product_id: 1,
            product_name: "Teh Botol".to_string(),
            quantity: 1,
            unit_price: subtotal,
            subtotal,
        }
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Active);
        assert_eq!(OrderStatus::Active.as_str(), "active");
        assert_eq!(OrderStatus::Void.as_str(), "void");
    }

    #[test]
    fn test_void_transition_is_terminal() {
        assert_eq!(OrderStatus::Active.void(9).unwrap(), OrderStatus::Void);
        assert!(OrderStatus::Void.is_terminal());

        let err = OrderStatus::Void.void(9).unwrap_err();
        assert!(matches!(err, CoreError::OrderAlreadyVoided(9)));
    }

    #[test]
    fn test_order_reconciliation() {
        let mut order = Order {
            id: 1,
            total_amount: 250,
            payment_method: "cash".to_string(),
            discount: 50,
            notes: String::new(),
            status: OrderStatus::Active,
            created_at: Utc::now(),
            voided_at: None,
            details: vec![detail(100), detail(200)],
        };
        assert_eq!(order.gross_amount(), 300);
        assert!(order.is_reconciled());

        order.total_amount = 300;
        assert!(!order.is_reconciled());
    }

    #[test]
    fn test_date_range_contains() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let range = DateRange::new(d("2026-02-01"), d("2026-02-08"));
        assert!(range.contains(d("2026-02-01")));
        assert!(range.contains(d("2026-02-08")));
        assert!(!range.contains(d("2026-02-09")));
        assert!(DateRange::single_day(d("2026-02-03")).contains(d("2026-02-03")));
    }

    #[test]
    fn test_checkout_request_deserializes_with_defaults() {
        let req: CheckoutRequest =
            serde_json::from_str(r#"{"items":[{"product_id":3,"quantity":5}]}"#).unwrap();
        assert_eq!(req.items, vec![CheckoutItem::new(3, 5)]);
        assert_eq!(req.payment_method, "");
        assert_eq!(req.discount, 0);
        assert_eq!(req.notes, "");
    }

    #[test]
    fn test_empty_report_serializes_null_best_seller() {
        let json = serde_json::to_value(ReportSummary::default()).unwrap();
        assert_eq!(json["total_revenue"], 0);
        assert_eq!(json["total_transactions"], 0);
        assert!(json["best_selling_product"].is_null());
        assert_eq!(json["category_breakdown"], serde_json::json!([]));
    }

    #[test]
    fn test_order_omits_voided_at_while_active() {
        let order = Order {
            id: 3,
            total_amount: 100,
            payment_method: "cash".to_string(),
            discount: 0,
            notes: String::new(),
            status: OrderStatus::Active,
            created_at: Utc::now(),
            voided_at: None,
            details: vec![detail(100)],
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "active");
        assert!(json.get("voided_at").is_none());
        assert_eq!(json["details"][0]["product_name"], "Teh Botol");
    }
}
