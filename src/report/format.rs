//! Formatted terminal output for the CLI subcommands.
//!
//! We keep formatting code in one place so:
//! - the analytics code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{ConnectionStatus, CostPanel, MonthlyBucket, SalesSummary, StatCard, TimeRange};

/// Width of the widest bar in text charts.
const BAR_WIDTH: usize = 40;

/// Format `value` with `decimals` fraction digits and comma thousands separators.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Compact axis label: `950`, `12.5K`, `1.3M`.
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

pub fn format_status(status: &ConnectionStatus, api_base: &str) -> String {
    let mut out = String::new();
    let state = if status.is_connected() { "connected" } else { "disconnected" };
    out.push_str(&format!("Backend: {api_base}\n"));
    out.push_str(&format!("Status: {state} (reported '{}')\n", status.status));
    if let Some(msg) = &status.message {
        out.push_str(&format!("Message: {msg}\n"));
    }
    out
}

/// Monthly table, text bar chart, and the three summary figures.
pub fn format_sales_report(buckets: &[MonthlyBucket], summary: &SalesSummary, range: TimeRange) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Sales Performance ({}) ===\n", range.display_name()));

    if buckets.is_empty() {
        out.push_str("No sales data.\n");
        return out;
    }

    let max_sales = buckets.iter().map(|b| b.sales_total).fold(0.0_f64, f64::max);

    out.push_str(
        format!("{:<14} {:>16} {:>14} {:>8}  {}", "period", "sales", "returns", "rate", "")
            .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<14} {:-<16} {:-<14} {:-<8}", "", "", "", "").trim_end());
    out.push('\n');

    for b in buckets {
        let rate = crate::analytics::return_rate_pct(b.sales_total, b.returns_total);
        let line = format!(
            "{:<14} {:>16} {:>14} {:>7.1}%  {}",
            b.label,
            format_grouped(b.sales_total, 2),
            format_grouped(b.returns_total, 2),
            rate,
            bar(b.sales_total, max_sales, BAR_WIDTH),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!("Total Sales:   {}\n", format_grouped(summary.total_sales, 2)));
    out.push_str(&format!("Total Returns: {}\n", format_grouped(summary.total_returns, 2)));
    out.push_str(&format!("Return Rate:   {:.1}%\n", summary.return_rate_pct));
    out
}

pub fn format_cost_panel(panel: &CostPanel) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", panel.view.display_name()));

    let label_width = panel.slices.iter().map(|s| s.label.len()).max().unwrap_or(0);
    let max_pct = panel.slices.iter().map(|s| s.percentage).fold(0.0_f64, f64::max);
    for slice in panel.slices {
        out.push_str(&format!(
            "{:<width$}  {:>5.1}%  {}\n",
            slice.label,
            slice.percentage,
            bar(slice.percentage, max_pct, BAR_WIDTH / 2),
            width = label_width,
        ));
    }

    out.push_str(&format!("\n{}\n", panel.heading));
    out.push_str(panel.summary);
    out.push_str("\n\n");
    out.push_str(panel.insights_title);
    out.push('\n');
    for insight in panel.insights {
        out.push_str(&format!("  - {insight}\n"));
    }
    out
}

pub fn format_overview(cards: &[StatCard]) -> String {
    let title_width = cards.iter().map(|c| c.title.len()).max().unwrap_or(0);
    let value_width = cards.iter().map(|c| c.value.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for card in cards {
        // Pad by chars: the currency sign is multi-byte.
        let pad = value_width.saturating_sub(card.value.chars().count());
        out.push_str(&format!(
            "{:<title_width$}  {}{}  {}\n",
            card.title,
            " ".repeat(pad),
            card.value,
            card.caption,
        ));
    }
    out
}

pub fn format_categories(categories: &[String]) -> String {
    if categories.is_empty() {
        return "No categories.\n".to_string();
    }
    let mut out = String::new();
    for c in categories {
        out.push_str(c);
        out.push('\n');
    }
    out
}

fn bar(value: f64, max: f64, width: usize) -> String {
    if !(max > 0.0) || !(value > 0.0) {
        return String::new();
    }
    let n = ((value / max) * width as f64).round() as usize;
    "#".repeat(n.clamp(1, width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Period;

    fn bucket(month: u32, sales: f64, returns: f64) -> MonthlyBucket {
        let period = Period::Month { year: 2024, month };
        MonthlyBucket {
            period,
            label: period.label(),
            sales_total: sales,
            returns_total: returns,
        }
    }

    #[test]
    fn grouped_numbers() {
        assert_eq!(format_grouped(1_293_847.15, 2), "1,293,847.15");
        assert_eq!(format_grouped(4312.0, 0), "4,312");
        assert_eq!(format_grouped(999.0, 0), "999");
        assert_eq!(format_grouped(1000.0, 0), "1,000");
        assert_eq!(format_grouped(0.0, 2), "0.00");
        assert_eq!(format_grouped(-1234.5, 1), "-1,234.5");
        assert_eq!(format_grouped(-0.001, 2), "0.00");
        assert_eq!(format_grouped(f64::NAN, 2), "-");
    }

    #[test]
    fn compact_labels() {
        assert_eq!(format_compact(950.0), "950");
        assert_eq!(format_compact(12_500.0), "12.5K");
        assert_eq!(format_compact(1_260_000.0), "1.3M");
    }

    #[test]
    fn sales_report_lists_each_month_and_totals() {
        let buckets = vec![bucket(1, 150.0, 50.0), bucket(2, 200.0, 0.0)];
        let summary = crate::analytics::summarize(&buckets);
        let text = format_sales_report(&buckets, &summary, TimeRange::TwelveMonths);
        assert!(text.contains("Last 12 months"));
        assert!(text.contains("Jan 2024"));
        assert!(text.contains("Feb 2024"));
        assert!(text.contains("Total Sales:   350.00"));
        assert!(text.contains("Total Returns: 50.00"));
        assert!(text.contains("Return Rate:   14.3%"));
        assert!(text.lines().all(|l| l == l.trim_end()));
    }

    #[test]
    fn empty_sales_report() {
        let text = format_sales_report(&[], &SalesSummary::default(), TimeRange::ThreeMonths);
        assert!(text.contains("No sales data."));
    }

    #[test]
    fn cost_panel_text_has_every_slice_and_insight() {
        let panel = crate::data::mock::cost_panel(crate::domain::CostView::Breakdown);
        let text = format_cost_panel(&panel);
        for slice in panel.slices {
            assert!(text.contains(slice.label));
        }
        assert!(text.contains("40.0%"));
        assert!(text.contains("Optimization Opportunities:"));
        assert_eq!(text.matches("  - ").count(), panel.insights.len());
    }

    #[test]
    fn status_text_reports_raw_status() {
        let status = ConnectionStatus {
            status: "disconnected".to_string(),
            message: Some("MongoDB client not initialized".to_string()),
        };
        let text = format_status(&status, "http://127.0.0.1:5000");
        assert!(text.contains("Status: disconnected"));
        assert!(text.contains("MongoDB client not initialized"));
    }

    #[test]
    fn bars_scale_to_width() {
        assert_eq!(bar(10.0, 10.0, 20).len(), 20);
        assert_eq!(bar(0.1, 10.0, 20).len(), 1);
        assert_eq!(bar(0.0, 10.0, 20), "");
        assert_eq!(bar(5.0, 0.0, 20), "");
    }
}
