//! Static dashboard content: overview statistics and cost tables.
//!
//! These figures are not backed by any endpoint; they ship with the binary.

use crate::domain::{CostPanel, CostSlice, CostView, StatCard};
use crate::report::format_grouped;

pub const COST_BREAKDOWN: [CostSlice; 5] = [
    CostSlice { label: "Product Cost", percentage: 40.0 },
    CostSlice { label: "Shipping", percentage: 15.0 },
    CostSlice { label: "Marketing", percentage: 20.0 },
    CostSlice { label: "Returns", percentage: 10.0 },
    CostSlice { label: "Platform Fees", percentage: 15.0 },
];

pub const COST_BY_CATEGORY: [CostSlice; 5] = [
    CostSlice { label: "Handicraft", percentage: 45.0 },
    CostSlice { label: "Footwear", percentage: 25.0 },
    CostSlice { label: "Clothes", percentage: 15.0 },
    CostSlice { label: "Packed Foods", percentage: 8.0 },
    CostSlice { label: "Artifacts", percentage: 7.0 },
];

const BREAKDOWN_INSIGHTS: [&str; 4] = [
    "Consider negotiating better rates with suppliers to reduce product costs",
    "Optimize marketing campaigns to improve ROI",
    "Review shipping strategies to reduce associated costs",
    "Implement strategies to minimize returns",
];

const CATEGORY_INSIGHTS: [&str; 4] = [
    "Handicrafts: High cost, but typically higher margins",
    "Footwear: Moderate costs with stable demand",
    "Clothes: Lower investment with seasonal variations",
    "Artifacts: Low cost inventory with consistent sales",
];

pub fn cost_panel(view: CostView) -> CostPanel {
    match view {
        CostView::Breakdown => CostPanel {
            view,
            slices: &COST_BREAKDOWN,
            heading: "Cost Analysis",
            summary: "The chart shows the breakdown of costs associated with your products. \
                      Product costs make up the largest portion at 40%, followed by marketing expenses at 20%.",
            insights_title: "Optimization Opportunities:",
            insights: &BREAKDOWN_INSIGHTS,
        },
        CostView::Category => CostPanel {
            view,
            slices: &COST_BY_CATEGORY,
            heading: "Category Analysis",
            summary: "Handicrafts products account for the highest proportion of your costs at 45%, \
                      followed by Footwear products at 25%. This aligns with the higher inventory \
                      investment typically required for these categories.",
            insights_title: "Category Insights:",
            insights: &CATEGORY_INSIGHTS,
        },
    }
}

/// Headline figures for the overview grid.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewStats {
    pub total_products: u32,
    pub total_sales: f64,
    pub revenue: f64,
    pub growth_rate_pct: f64,
    pub return_rate_pct: f64,
    pub total_customers: u32,
    pub avg_order_value: f64,
    pub top_product: &'static str,
}

pub const OVERVIEW: OverviewStats = OverviewStats {
    total_products: 267,
    total_sales: 1_293_847.15,
    revenue: 970_853.45,
    growth_rate_pct: 12.7,
    return_rate_pct: 25.0,
    total_customers: 4312,
    avg_order_value: 1026.14,
    top_product: "Silk Kurti",
};

pub const CURRENCY: &str = "₹";

/// The eight overview cards, in grid order.
pub fn stat_cards(stats: &OverviewStats) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Total Products",
            value: stats.total_products.to_string(),
            caption: "+9% from last month",
        },
        StatCard {
            title: "Total Sales",
            value: format!("{CURRENCY}{}", format_grouped(stats.total_sales, 2)),
            caption: "+5% from last month",
        },
        StatCard {
            title: "Revenue",
            value: format!("{CURRENCY}{}", format_grouped(stats.revenue, 2)),
            caption: "+8% from last month",
        },
        StatCard {
            title: "Growth Rate",
            value: format!("{:.1}%", stats.growth_rate_pct),
            caption: "+1.2% from last month",
        },
        StatCard {
            title: "Total Customers",
            value: format_grouped(stats.total_customers as f64, 0),
            caption: "+6% from last month",
        },
        StatCard {
            title: "Return Rate",
            value: format!("{:.1}%", stats.return_rate_pct),
            caption: "-0.4% from last month",
        },
        StatCard {
            title: "Avg. Order Value",
            value: format!("{CURRENCY}{:.2}", stats.avg_order_value),
            caption: "+3.3% from last month",
        },
        StatCard {
            title: "Top Product",
            value: stats.top_product.to_string(),
            caption: "Based on last month's sales",
        },
    ]
}

/// Starter prompts for the question panel.
pub const EXAMPLE_QUESTIONS: [&str; 3] = [
    "What customer segments are generating the highest lifetime value, and how can I target them more effectively?",
    "Are there emerging trends in customer preferences that I should align my product offerings with?",
    "How can I use return rate data to improve product descriptions and reduce losses?",
];
