//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be:
//!
//! - decoded straight from the backend's JSON payloads
//! - aggregated and filtered in memory
//! - exported to JSON/CSV or rendered by the TUI

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// Status string the backend uses for cancelled orders.
pub const CANCELLED: &str = "Cancelled";

/// Order status as reported by the sales collection.
///
/// Only `Cancelled` has meaning for analytics (it marks a return); every other
/// status is kept verbatim for display and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Cancelled => CANCELLED,
            OrderStatus::Other(s) => s,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Other(String::new())
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        // Exact match: "cancelled" or "Cancelled " are not returns.
        if value == CANCELLED {
            OrderStatus::Cancelled
        } else {
            OrderStatus::Other(value)
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        OrderStatus::from(value.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Cancelled => CANCELLED.to_string(),
            OrderStatus::Other(s) => s,
        }
    }
}

/// One raw sales row from `/api/data/Sal`.
///
/// Rows come from a schemaless collection, so decoding is lenient: unknown
/// fields are ignored, a missing or non-numeric amount counts as `0`, and a
/// date that is not a string is kept in its JSON text form (it will land in
/// the invalid-date bucket).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Order_Date", default, deserialize_with = "lenient_text")]
    pub order_date: String,
    #[serde(rename = "Total_Amount", default, deserialize_with = "lenient_amount")]
    pub total_amount: f64,
    #[serde(rename = "Order_Status", default, deserialize_with = "lenient_status")]
    pub order_status: OrderStatus,
}

impl SalesRecord {
    pub fn new(order_date: impl Into<String>, total_amount: f64, order_status: impl Into<OrderStatus>) -> Self {
        Self {
            order_date: order_date.into(),
            total_amount,
            order_status: order_status.into(),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let amount = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if amount.is_finite() { amount } else { 0.0 })
}

fn lenient_status<'de, D>(deserializer: D) -> Result<OrderStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(OrderStatus::from).unwrap_or_default())
}

/// Aggregation key: a calendar month, or the catch-all for unparseable dates.
///
/// The derived ordering places `Invalid` before every real month, then sorts
/// months chronologically (year, then month). Trailing windows therefore
/// only ever hold real months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Invalid,
    Month { year: i32, month: u32 },
}

impl Period {
    pub fn from_date(date: NaiveDate) -> Self {
        Period::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Short display label, e.g. `Jan 2024`.
    pub fn label(&self) -> String {
        match *self {
            Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_else(|| "Invalid Date".to_string()),
            Period::Invalid => "Invalid Date".to_string(),
        }
    }
}

/// Per-month sales aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    #[serde(skip)]
    pub period: Period,
    #[serde(rename = "period")]
    pub label: String,
    pub sales_total: f64,
    pub returns_total: f64,
}

impl MonthlyBucket {
    pub fn empty(period: Period) -> Self {
        Self {
            period,
            label: period.label(),
            sales_total: 0.0,
            returns_total: 0.0,
        }
    }
}

/// Trailing window selector for the sales chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimeRange {
    #[value(name = "3m")]
    ThreeMonths,
    #[value(name = "6m")]
    SixMonths,
    #[default]
    #[value(name = "12m")]
    TwelveMonths,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::TwelveMonths,
    ];

    /// Number of trailing buckets to keep; `None` keeps everything.
    pub fn trailing_months(self) -> Option<usize> {
        match self {
            TimeRange::ThreeMonths => Some(3),
            TimeRange::SixMonths => Some(6),
            TimeRange::TwelveMonths => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TimeRange::ThreeMonths => "Last 3 months",
            TimeRange::SixMonths => "Last 6 months",
            TimeRange::TwelveMonths => "Last 12 months",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeRange::ThreeMonths => TimeRange::SixMonths,
            TimeRange::SixMonths => TimeRange::TwelveMonths,
            TimeRange::TwelveMonths => TimeRange::ThreeMonths,
        }
    }
}

/// Totals over a (filtered) bucket sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SalesSummary {
    pub total_sales: f64,
    pub total_returns: f64,
    /// Returns as a percentage of sales; `0` when there are no sales.
    pub return_rate_pct: f64,
}

/// One slice of a cost pie chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostSlice {
    pub label: &'static str,
    pub percentage: f64,
}

/// Which cost table the cost panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CostView {
    #[default]
    Breakdown,
    Category,
}

impl CostView {
    pub fn display_name(self) -> &'static str {
        match self {
            CostView::Breakdown => "Cost Breakdown",
            CostView::Category => "By Category",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            CostView::Breakdown => CostView::Category,
            CostView::Category => CostView::Breakdown,
        }
    }
}

/// Static content of one cost view: slices plus the commentary shown next to the chart.
#[derive(Debug, Clone, Copy)]
pub struct CostPanel {
    pub view: CostView,
    pub slices: &'static [CostSlice],
    pub heading: &'static str,
    pub summary: &'static str,
    pub insights_title: &'static str,
    pub insights: &'static [&'static str],
}

/// A headline statistic on the overview grid.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    /// Month-over-month caption, e.g. `+9% from last month`.
    pub caption: &'static str,
}

/// Body of `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        self.status == "connected"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sales_record_decodes_backend_row() {
        let json = r#"{
            "Order_ID": "ORD-1",
            "Order_Date": "Mon, 15 Jan 2024 00:00:00 GMT",
            "Total_Amount": 1499.5,
            "Order_Status": "Cancelled"
        }"#;
        let rec: SalesRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.order_date, "Mon, 15 Jan 2024 00:00:00 GMT");
        assert_eq!(rec.total_amount, 1499.5);
        assert!(rec.order_status.is_cancelled());
    }

    #[test]
    fn sales_record_tolerates_missing_and_odd_fields() {
        let rec: SalesRecord = serde_json::from_str(r#"{"Order_Date": "2024-02-01"}"#).unwrap();
        assert_eq!(rec.total_amount, 0.0);
        assert!(!rec.order_status.is_cancelled());

        let rec: SalesRecord =
            serde_json::from_str(r#"{"Order_Date": null, "Total_Amount": null, "Order_Status": null}"#).unwrap();
        assert_eq!(rec.order_date, "");
        assert_eq!(rec.total_amount, 0.0);

        let rec: SalesRecord =
            serde_json::from_str(r#"{"Order_Date": 20240101, "Total_Amount": "250.25"}"#).unwrap();
        assert_eq!(rec.order_date, "20240101");
        assert_eq!(rec.total_amount, 250.25);
    }

    #[test]
    fn only_exact_cancelled_marks_a_return() {
        assert!(OrderStatus::from("Cancelled").is_cancelled());
        assert!(!OrderStatus::from("cancelled").is_cancelled());
        assert!(!OrderStatus::from("Delivered").is_cancelled());
        assert_eq!(OrderStatus::from("Shipped").as_str(), "Shipped");
    }

    #[test]
    fn periods_order_chronologically_with_invalid_first() {
        let mut periods = vec![
            Period::Invalid,
            Period::Month { year: 2024, month: 2 },
            Period::Month { year: 2023, month: 12 },
            Period::Month { year: 2024, month: 1 },
        ];
        periods.sort();
        assert_eq!(
            periods,
            vec![
                Period::Invalid,
                Period::Month { year: 2023, month: 12 },
                Period::Month { year: 2024, month: 1 },
                Period::Month { year: 2024, month: 2 },
            ]
        );
    }

    #[test]
    fn period_labels() {
        assert_eq!(Period::Month { year: 2024, month: 9 }.label(), "Sep 2024");
        assert_eq!(Period::Invalid.label(), "Invalid Date");
    }

    #[test]
    fn time_range_cycles_and_windows() {
        assert_eq!(TimeRange::default(), TimeRange::TwelveMonths);
        assert_eq!(TimeRange::ThreeMonths.trailing_months(), Some(3));
        assert_eq!(TimeRange::SixMonths.trailing_months(), Some(6));
        assert_eq!(TimeRange::TwelveMonths.trailing_months(), None);
        let mut r = TimeRange::ThreeMonths;
        for _ in 0..3 {
            r = r.next();
        }
        assert_eq!(r, TimeRange::ThreeMonths);
    }

    #[test]
    fn time_range_parses_cli_names() {
        assert_eq!(TimeRange::from_str("3m", false).unwrap(), TimeRange::ThreeMonths);
        assert_eq!(TimeRange::from_str("12m", false).unwrap(), TimeRange::TwelveMonths);
        assert!(TimeRange::from_str("24m", false).is_err());
    }

    #[test]
    fn connection_status_only_accepts_connected() {
        let ok: ConnectionStatus = serde_json::from_str(r#"{"status":"connected","message":"ok"}"#).unwrap();
        assert!(ok.is_connected());
        let down: ConnectionStatus = serde_json::from_str(r#"{"status":"disconnected"}"#).unwrap();
        assert!(!down.is_connected());
        assert_eq!(down.message, None);
    }
}
