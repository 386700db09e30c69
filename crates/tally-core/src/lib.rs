//! # tally-core: Pure Business Logic for Tally POS
//!
//! This crate holds the rules of the transaction engine as pure functions
//! with zero I/O dependencies. `tally-db` runs them inside its atomic units.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Presentation layer (HTTP, auth) - external           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CheckoutRequest / order id / dates     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │ validation│  │   │
//! │  │   │   Order   │  │   Money   │  │ discount  │  │  checkout │  │   │
//! │  │   │  Reports  │  │           │  │  clamping │  │ date range│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-db (Transaction Engine)                │   │
//! │  │        ledger, checkout, void, reports, migrations              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, reports, ...)
//! - [`money`] - Money type with checked integer arithmetic
//! - [`totals`] - Order total accumulation and discount clamping
//! - [`error`] - Domain error types and the [`ErrorKind`] discriminant
//! - [`validation`] - Checkout, id and date-range validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::money::Money;
//! use tally_core::totals::TotalsAccumulator;
//!
//! let mut totals = TotalsAccumulator::new();
//! totals.add_line(Money::from_minor(3_000), 5).unwrap();
//! totals.add_line(Money::from_minor(12_500), 1).unwrap();
//!
//! // A discount larger than the gross amount is clamped.
//! let finished = totals.finish(100_000);
//! assert_eq!(finished.gross.minor(), 27_500);
//! assert_eq!(finished.discount.minor(), 27_500);
//! assert_eq!(finished.total.minor(), 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Payment method recorded when the request leaves it blank.
pub const DEFAULT_PAYMENT_METHOD: &str = "cash";

/// Products with stock strictly below this count as "low stock" on the
/// dashboard unless the deployment configures another threshold.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Bucket name for line items whose product has no category (or no longer exists).
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Category id reported for the uncategorized bucket.
pub const UNCATEGORIZED_ID: i64 = 0;

/// Page size used by order history when the caller passes none.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Upper bound on order history page size.
pub const MAX_PAGE_LIMIT: i64 = 100;
