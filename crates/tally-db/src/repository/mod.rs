//! # Repository Module
//!
//! Database repository implementations for Tally POS.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  db.orders()    OrderRepository     checkout · void · get_by_id · list  │
//! │       │                                                                 │
//! │       │ borrows the open transaction                                    │
//! │       ▼                                                                 │
//! │  InventoryLedger<'c>               read · reserve · release             │
//! │                                                                         │
//! │  db.reports()   ReportRepository    today · sales_report · summary ·    │
//! │                                     dashboard (read-only)               │
//! │                                                                         │
//! │  db.products()  ProductRepository   catalog fixtures + stock_level      │
//! │  db.categories() CategoryRepository                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`OrderRepository`] - Checkout, void and order history
//! - [`ReportRepository`] - Revenue, best seller, category and dashboard reports
//! - [`ProductRepository`] / [`CategoryRepository`] - Catalog boundary
//! - [`InventoryLedger`] - Stock primitives used inside transactions
//!
//! [`OrderRepository`]: order::OrderRepository
//! [`ReportRepository`]: report::ReportRepository
//! [`ProductRepository`]: product::ProductRepository
//! [`CategoryRepository`]: product::CategoryRepository
//! [`InventoryLedger`]: inventory::InventoryLedger

pub mod inventory;
pub mod order;
pub mod product;
pub mod report;
