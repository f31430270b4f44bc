//! Shared "sales pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch (or generate) records -> monthly aggregation -> range window -> summary
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;

use crate::analytics::{aggregate_monthly, filter_range, summarize};
use crate::data::{DashboardClient, DemoConfig, generate_sales};
use crate::domain::{MonthlyBucket, SalesRecord, SalesSummary, TimeRange};
use crate::error::AppError;

/// Where sales rows come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SalesSource {
    Backend,
    Demo(DemoConfig),
}

impl SalesSource {
    pub fn demo(seed: u64, months: u32, end: NaiveDate) -> Self {
        SalesSource::Demo(DemoConfig::new(seed, months, end))
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, SalesSource::Demo(_))
    }

    /// Same source with the next seed; backend sources are unchanged.
    pub fn reseeded(&self) -> Self {
        match self {
            SalesSource::Backend => SalesSource::Backend,
            SalesSource::Demo(cfg) => SalesSource::Demo(DemoConfig {
                seed: cfg.seed.wrapping_add(1),
                ..cfg.clone()
            }),
        }
    }

    pub fn load_records(&self, client: &DashboardClient) -> Result<Vec<SalesRecord>, AppError> {
        match self {
            SalesSource::Backend => Ok(client.sales_records()?),
            SalesSource::Demo(cfg) => generate_sales(cfg),
        }
    }
}

/// Aggregated sales history, recomputed on every load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesSeries {
    pub buckets: Vec<MonthlyBucket>,
    pub record_count: usize,
}

impl SalesSeries {
    pub fn from_records(records: &[SalesRecord]) -> Self {
        Self {
            buckets: aggregate_monthly(records),
            record_count: records.len(),
        }
    }

    pub fn window(&self, range: TimeRange) -> SalesWindow<'_> {
        let buckets = filter_range(&self.buckets, range);
        SalesWindow {
            range,
            buckets,
            summary: summarize(buckets),
        }
    }
}

/// The slice of history shown for one time range, with its totals.
#[derive(Debug, Clone, Copy)]
pub struct SalesWindow<'a> {
    pub range: TimeRange,
    pub buckets: &'a [MonthlyBucket],
    pub summary: SalesSummary,
}

/// Fetch or generate records and aggregate them.
pub fn load_sales(source: &SalesSource, client: &DashboardClient) -> Result<SalesSeries, AppError> {
    let records = source.load_records(client)?;
    Ok(SalesSeries::from_records(&records))
}

/// The question exactly as typed, or a usage error for blank input.
pub fn validate_question(raw: &str) -> Result<&str, AppError> {
    if raw.trim().is_empty() {
        return Err(AppError::usage("Empty question: please enter a question to analyze."));
    }
    Ok(raw)
}
