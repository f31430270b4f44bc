//! Monthly aggregation of raw sales rows.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::{MonthlyBucket, Period, SalesRecord};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse an order date in any of the shapes the backend emits.
///
/// Flask renders BSON datetimes as HTTP dates (`Mon, 15 Jan 2024 00:00:00 GMT`);
/// rows imported from spreadsheets usually carry plain ISO dates. Zoned values
/// keep the calendar date of their own offset.
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Aggregation key for a record; unparseable dates share `Period::Invalid`.
pub fn period_of(record: &SalesRecord) -> Period {
    parse_order_date(&record.order_date)
        .map(Period::from_date)
        .unwrap_or(Period::Invalid)
}

/// Group records by calendar month and sum sales and returns.
///
/// Every record's amount goes into its bucket's `sales_total`; cancelled
/// orders are additionally summed into `returns_total`. Output is sorted by
/// (year, month) with the invalid-date bucket, if any, first.
pub fn aggregate_monthly(records: &[SalesRecord]) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<Period, MonthlyBucket> = BTreeMap::new();
    let mut invalid = 0usize;

    for record in records {
        let period = period_of(record);
        if period == Period::Invalid {
            invalid += 1;
        }
        let bucket = buckets
            .entry(period)
            .or_insert_with(|| MonthlyBucket::empty(period));
        bucket.sales_total += record.total_amount;
        if record.order_status.is_cancelled() {
            bucket.returns_total += record.total_amount;
        }
    }

    if invalid > 0 {
        tracing::warn!(invalid, "sales records with unparseable Order_Date");
    }

    buckets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, amount: f64, status: &str) -> SalesRecord {
        SalesRecord::new(date, amount, status)
    }

    #[test]
    fn parses_backend_date_shapes() {
        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        for raw in [
            "2024-01-15",
            " 2024-01-15 ",
            "2024-01-15T08:30:00",
            "2024-01-15T08:30:00.123",
            "2024-01-15 08:30:00",
            "2024-01-15T08:30",
            "2024-01-15T08:30:00Z",
            "2024-01-15T08:30:00+05:30",
            "Mon, 15 Jan 2024 00:00:00 GMT",
            "01/15/2024",
            "2024/01/15",
        ] {
            assert_eq!(parse_order_date(raw), Some(jan15), "failed on {raw:?}");
        }
    }

    #[test]
    fn rejects_garbage_dates() {
        for raw in ["", "   ", "yesterday", "2024-13-01", "15.01.2024"] {
            assert_eq!(parse_order_date(raw), None, "accepted {raw:?}");
        }
    }

    #[test]
    fn worked_example_from_two_months() {
        let records = vec![
            rec("2024-01-10", 100.0, "Delivered"),
            rec("2024-01-20", 50.0, "Cancelled"),
            rec("2024-02-05", 200.0, "Delivered"),
        ];
        let buckets = aggregate_monthly(&records);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "Jan 2024");
        assert_eq!(buckets[0].sales_total, 150.0);
        assert_eq!(buckets[0].returns_total, 50.0);
        assert_eq!(buckets[1].label, "Feb 2024");
        assert_eq!(buckets[1].sales_total, 200.0);
        assert_eq!(buckets[1].returns_total, 0.0);
    }

    #[test]
    fn output_is_chronological_regardless_of_input_order() {
        let records = vec![
            rec("2024-03-01", 1.0, "Delivered"),
            rec("2023-11-30", 1.0, "Delivered"),
            rec("2024-01-01", 1.0, "Delivered"),
            rec("2023-12-31", 1.0, "Delivered"),
            rec("2024-03-31", 1.0, "Delivered"),
        ];
        let buckets = aggregate_monthly(&records);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Nov 2023", "Dec 2023", "Jan 2024", "Mar 2024"]);
        assert!(buckets.windows(2).all(|w| w[0].period <= w[1].period));
    }

    #[test]
    fn totals_are_conserved() {
        let records: Vec<SalesRecord> = (0..60)
            .map(|i| {
                let month = (i % 12) + 1;
                let year = 2022 + (i / 24);
                let status = if i % 7 == 0 { "Cancelled" } else { "Shipped" };
                rec(&format!("{year}-{month:02}-03"), 10.0 + i as f64 * 1.5, status)
            })
            .collect();
        let buckets = aggregate_monthly(&records);

        let input_total: f64 = records.iter().map(|r| r.total_amount).sum();
        let output_total: f64 = buckets.iter().map(|b| b.sales_total).sum();
        assert!((input_total - output_total).abs() < 1e-9);

        let input_returns: f64 = records
            .iter()
            .filter(|r| r.order_status.is_cancelled())
            .map(|r| r.total_amount)
            .sum();
        let output_returns: f64 = buckets.iter().map(|b| b.returns_total).sum();
        assert!((input_returns - output_returns).abs() < 1e-9);

        for b in &buckets {
            assert!(b.returns_total <= b.sales_total, "{} returns exceed sales", b.label);
        }
    }

    #[test]
    fn malformed_dates_collect_in_leading_invalid_bucket() {
        let records = vec![
            rec("not a date", 40.0, "Cancelled"),
            rec("2024-05-02", 10.0, "Delivered"),
            rec("", 5.0, "Delivered"),
        ];
        let buckets = aggregate_monthly(&records);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].label, "May 2024");
        let invalid = &buckets[0];
        assert_eq!(invalid.period, Period::Invalid);
        assert_eq!(invalid.label, "Invalid Date");
        assert_eq!(invalid.sales_total, 45.0);
        assert_eq!(invalid.returns_total, 40.0);
    }

    #[test]
    fn empty_input_yields_no_buckets() {
        assert!(aggregate_monthly(&[]).is_empty());
    }
}
