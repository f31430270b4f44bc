//! Synthetic sales records for running the dashboard without a backend.
//!
//! Output is fully determined by `DemoConfig`: the same seed and end month
//! always produce the same rows.

use chrono::{Datelike, Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::LogNormal;

use crate::domain::{CANCELLED, SalesRecord};
use crate::error::AppError;

/// Log-space location/scale of order values: median ≈ 900, mean ≈ 1040.
const AMOUNT_MU: f64 = 6.8;
const AMOUNT_SIGMA: f64 = 0.55;
/// Peak-to-trough swing of monthly order volume.
const SEASONAL_AMPLITUDE: f64 = 0.25;
const OPEN_STATUSES: [&str; 3] = ["Delivered", "Shipped", "Pending"];
/// Longest demo history accepted (ten years).
pub const MAX_DEMO_MONTHS: u32 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub seed: u64,
    /// Number of calendar months to cover, ending with `end`'s month.
    pub months: u32,
    pub orders_per_month: u32,
    pub cancel_rate: f64,
    pub end: NaiveDate,
}

impl DemoConfig {
    pub fn new(seed: u64, months: u32, end: NaiveDate) -> Self {
        Self {
            seed,
            months,
            orders_per_month: 120,
            cancel_rate: 0.08,
            end,
        }
    }
}

pub fn generate_sales(config: &DemoConfig) -> Result<Vec<SalesRecord>, AppError> {
    if config.months == 0 || config.months > MAX_DEMO_MONTHS {
        return Err(AppError::usage(format!("Demo months must be in 1..={MAX_DEMO_MONTHS}.")));
    }
    if config.orders_per_month == 0 {
        return Err(AppError::usage("Demo orders per month must be > 0."));
    }
    if !(0.0..1.0).contains(&config.cancel_rate) {
        return Err(AppError::usage("Demo cancel rate must be in [0, 1)."));
    }

    let amounts = LogNormal::new(AMOUNT_MU, AMOUNT_SIGMA)
        .map_err(|e| AppError::runtime(format!("Amount distribution error: {e}")))?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let last_month = first_of_month(config.end);
    let capacity = (config.months as usize)
        .checked_mul(config.orders_per_month as usize)
        .ok_or_else(|| AppError::usage("Demo size is too large."))?;
    let mut records = Vec::with_capacity(capacity);

    for back in (0..config.months).rev() {
        let start = last_month
            .checked_sub_months(Months::new(back))
            .ok_or_else(|| AppError::usage("Demo period reaches before the supported calendar."))?;
        let days = days_in_month(start);

        let phase = std::f64::consts::TAU * f64::from(start.month0()) / 12.0;
        let seasonal = 1.0 + SEASONAL_AMPLITUDE * phase.sin();
        let jitter = rng.gen_range(0.85..1.15);
        let orders = (f64::from(config.orders_per_month) * seasonal * jitter).round().max(1.0) as u32;

        for _ in 0..orders {
            let day = rng.gen_range(1..=days);
            let hour = rng.gen_range(8..22);
            let minute = rng.gen_range(0..60);
            let date = start.with_day(day).unwrap_or(start);

            let amount = (amounts.sample(&mut rng) * 100.0).round() / 100.0;
            let status = if rng.gen_bool(config.cancel_rate) {
                CANCELLED
            } else {
                OPEN_STATUSES[rng.gen_range(0..OPEN_STATUSES.len())]
            };

            records.push(SalesRecord::new(
                format!("{}T{hour:02}:{minute:02}:00", date.format("%Y-%m-%d")),
                amount,
                status,
            ));
        }
    }

    tracing::debug!(records = records.len(), seed = config.seed, "generated demo sales");
    Ok(records)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn days_in_month(first: NaiveDate) -> u32 {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
