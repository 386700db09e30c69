//! # tally-db: Transaction Engine for Tally POS
//!
//! This crate runs the engine's atomic units against SQLite through sqlx:
//! the inventory ledger, checkout, void, and the reporting aggregations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Data Flow                              │
//! │                                                                         │
//! │  Presentation layer (HTTP handler, CLI, ...)                           │
//! │       │  db.orders().checkout(req)                                      │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ OrderRepo     │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ ReportRepo    │    │ 002_immut... │  │   │
//! │  │   │ WAL, busy     │    │ InventoryLedg │    │              │  │   │
//! │  │   │ timeout       │    │ Product/Categ │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │            ▲                    │ pure rules                    │   │
//! │  │   config::Settings              ▼                               │   │
//! │  │                          tally-core (totals, validation)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (tally.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Environment-driven settings
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Ledger, orders, reports and catalog fixtures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::{CheckoutItem, CheckoutRequest};
//! use tally_db::{config::Settings, Database};
//!
//! let db = Database::new(Settings::from_env()?.db_config()).await?;
//!
//! let order = db
//!     .orders()
//!     .checkout(CheckoutRequest::new(vec![CheckoutItem::new(1, 2)]))
//!     .await?;
//! db.orders().void(order.id).await?;
//!
//! let stats = db.reports().dashboard().await?;
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::inventory::{InventoryLedger, Restock};
pub use repository::order::OrderRepository;
pub use repository::product::{CategoryRepository, ProductRepository};
pub use repository::report::ReportRepository;
