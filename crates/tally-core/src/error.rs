//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── ValidationError  - Input rejected before storage is touched       │
//! │  ├── CoreError        - Business rule rejections (not found, stock,    │
//! │  │                      already voided)                                │
//! │  └── ErrorKind        - Stable discriminant for the presentation layer │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Storage faults + wrapped CoreError             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ErrorKind → caller      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse error category exposed to whatever sits in front of the engine.
///
/// The presentation layer maps these onto its own status codes; the engine
/// never decides what a kind means on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed input, detected before any storage access.
    Validation,
    /// Referenced product or order does not exist.
    NotFound,
    /// Requested quantity exceeds available stock.
    InsufficientStock,
    /// Operation conflicts with current state (order already voided).
    Conflict,
    /// Connection, timeout, lock or constraint failure. Not user-actionable.
    Storage,
}

// =============================================================================
// Core Error
// =============================================================================

/// Business rule rejections raised while running a checkout or void.
///
/// None of these are faults: each one aborts the enclosing atomic unit and
/// leaves stock and orders exactly as they were.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Checkout references a product id that does not exist
    #[error("product id {0} not found")]
    ProductNotFound(i64),

    /// Order cannot be found (void or lookup).
    #[error("order id {0} not found")]
    OrderNotFound(i64),

    /// Insufficient stock to complete the checkout.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout ([{ product: 7, qty: 3 }])
    ///      │
    ///      ▼
    /// Bounded decrement fails: stock = 2
    ///      │
    ///      ▼
    /// InsufficientStock { product_name: "Kopi Susu", available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// Whole checkout rolled back, caller shows "Only 2 Kopi Susu left"
    /// ```
    #[error("insufficient stock for product '{product_name}' (available: {available}, requested: {requested})")]
    InsufficientStock {
        product_id: i64,
        product_name: String,
        available: i64,
        requested: i64,
    },

    /// Void requested on an order that is already void.
    #[error("order id {0} is already voided")]
    OrderAlreadyVoided(i64),

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the category the presentation layer uses to pick a response.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ProductNotFound(_) | CoreError::OrderNotFound(_) => ErrorKind::NotFound,
            CoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            CoreError::OrderAlreadyVoided(_) => ErrorKind::Conflict,
            CoreError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements and are always
/// raised before the engine opens a transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            product_name: "Kopi Susu".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for product 'Kopi Susu' (available: 2, requested: 3)"
        );

        assert_eq!(
            CoreError::OrderAlreadyVoided(12).to_string(),
            "order id 12 is already voided"
        );
        assert_eq!(CoreError::ProductNotFound(4).to_string(), "product id 4 not found");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(CoreError::ProductNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::OrderNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::OrderAlreadyVoided(1).kind(), ErrorKind::Conflict);

        let core_err: CoreError = ValidationError::Required {
            field: "start_date".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_kind_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorKind::InsufficientStock).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_STOCK\"");
    }
}
