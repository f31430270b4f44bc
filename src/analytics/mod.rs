//! Client-side sales analytics: monthly aggregation, range windows, totals.

pub mod aggregate;
pub mod summary;

pub use aggregate::{aggregate_monthly, parse_order_date};
pub use summary::{filter_range, return_rate_pct, summarize};
