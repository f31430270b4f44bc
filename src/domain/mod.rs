//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - raw sales rows as decoded from the backend (`SalesRecord`, `OrderStatus`)
//! - derived monthly aggregates (`Period`, `MonthlyBucket`, `SalesSummary`)
//! - UI selectors (`TimeRange`, `CostView`) and static panel content

pub mod types;

pub use types::*;
