//! # Validation Module
//!
//! Input validation for the transaction engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (external)                                      │
//! │  └── Deserialization of the request body                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Non-empty items, positive ids and quantities                      │
//! │  └── Report dates parsed as YYYY-MM-DD                                 │
//! │           │  (no transaction is opened until this passes)              │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), CHECK (quantity > 0)                          │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{parse_date_range, validate_checkout};
//! use tally_core::{CheckoutItem, CheckoutRequest};
//!
//! let req = CheckoutRequest::new(vec![CheckoutItem::new(1, 2)]);
//! assert!(validate_checkout(&req).is_ok());
//!
//! let range = parse_date_range(Some("2026-02-01"), Some("2026-02-08")).unwrap();
//! assert_eq!(range.start.to_string(), "2026-02-01");
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{CheckoutRequest, DateRange, NewCategory, NewProduct};
use crate::{DEFAULT_PAGE_LIMIT, DEFAULT_PAYMENT_METHOD, MAX_PAGE_LIMIT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Calendar date format accepted by the reporting endpoints.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Checkout
// =============================================================================

/// Validates a checkout request before any storage access.
///
/// ## Rules
/// - `items` must not be empty
/// - every `product_id` must be > 0
/// - every `quantity` must be > 0
///
/// Discount is not validated here; it is clamped when totals are settled.
pub fn validate_checkout(req: &CheckoutRequest) -> ValidationResult<()> {
    if req.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for item in &req.items {
        validate_id("product_id", item.product_id)?;
        if item.quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }
    }

    Ok(())
}

/// Trims the payment method, falling back to `"cash"` when blank.
///
/// ```rust
/// use tally_core::validation::normalize_payment_method;
///
/// assert_eq!(normalize_payment_method("  qris "), "qris");
/// assert_eq!(normalize_payment_method("   "), "cash");
/// ```
pub fn normalize_payment_method(method: &str) -> String {
    let trimmed = method.trim();
    if trimmed.is_empty() {
        DEFAULT_PAYMENT_METHOD.to_string()
    } else {
        trimmed.to_string()
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// Validates a persisted row id (must be > 0).
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an order id before a void or lookup.
#[inline]
pub fn validate_order_id(order_id: i64) -> ValidationResult<()> {
    validate_id("order_id", order_id)
}

// =============================================================================
// Report Dates
// =============================================================================

/// Parses a required `YYYY-MM-DD` report date.
///
/// Missing or blank values are `Required`; anything chrono rejects is
/// `InvalidFormat`.
pub fn parse_report_date(field: &str, value: Option<&str>) -> ValidationResult<NaiveDate> {
    let raw = value.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("expected YYYY-MM-DD ({e})"),
    })
}

/// Parses an inclusive report range. Both ends are required.
///
/// A range whose start is after its end is accepted and simply matches
/// nothing.
pub fn parse_date_range(start: Option<&str>, end: Option<&str>) -> ValidationResult<DateRange> {
    let start = parse_report_date("start_date", start)?;
    let end = parse_report_date("end_date", end)?;
    Ok(DateRange::new(start, end))
}

// =============================================================================
// Pagination
// =============================================================================

/// Normalizes order-history paging input to `(page, limit)`.
///
/// ```rust
/// use tally_core::validation::normalize_pagination;
///
/// assert_eq!(normalize_pagination(0, 0), (1, 20));
/// assert_eq!(normalize_pagination(3, 500), (3, 100));
/// ```
pub fn normalize_pagination(page: i64, limit: i64) -> (i64, i64) {
    let page = page.max(1);
    let limit = if limit < 1 {
        DEFAULT_PAGE_LIMIT
    } else {
        limit.min(MAX_PAGE_LIMIT)
    };
    (page, limit)
}

// =============================================================================
// Catalog Fixtures
// =============================================================================

/// Validates a product before insertion.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    if product.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    if product.price < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    if product.stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    if let Some(category_id) = product.category_id {
        validate_id("category_id", category_id)?;
    }
    Ok(())
}

/// Validates a category before insertion.
pub fn validate_new_category(category: &NewCategory) -> ValidationResult<()> {
    if category.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
