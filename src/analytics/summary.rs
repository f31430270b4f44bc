//! Time-range windowing and headline totals for the sales panel.

use crate::domain::{MonthlyBucket, SalesSummary, TimeRange};

/// Trailing window of `buckets` for `range`.
///
/// Asking for more months than exist returns everything available.
pub fn filter_range(buckets: &[MonthlyBucket], range: TimeRange) -> &[MonthlyBucket] {
    match range.trailing_months() {
        Some(n) => &buckets[buckets.len().saturating_sub(n)..],
        None => buckets,
    }
}

/// Sum sales and returns over `buckets` and derive the return rate.
pub fn summarize(buckets: &[MonthlyBucket]) -> SalesSummary {
    let total_sales: f64 = buckets.iter().map(|b| b.sales_total).sum();
    let total_returns: f64 = buckets.iter().map(|b| b.returns_total).sum();
    SalesSummary {
        total_sales,
        total_returns,
        return_rate_pct: return_rate_pct(total_sales, total_returns),
    }
}

/// `returns / sales * 100`, or `0` when there were no sales.
pub fn return_rate_pct(total_sales: f64, total_returns: f64) -> f64 {
    if total_sales > 0.0 {
        total_returns / total_sales * 100.0
    } else {
        0.0
    }
}
