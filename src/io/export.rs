//! Export monthly sales buckets to CSV or JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::analytics::return_rate_pct;
use crate::domain::{MonthlyBucket, SalesSummary, TimeRange};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            _ => Err(AppError::usage(format!(
                "Unsupported export '{}': use a .csv or .json file name.",
                path.display()
            ))),
        }
    }
}

#[derive(Serialize)]
struct SalesExport<'a> {
    range: &'static str,
    summary: &'a SalesSummary,
    buckets: &'a [MonthlyBucket],
}

/// Write `buckets` (and, for JSON, the summary) to `path`.
pub fn write_sales_export(
    path: &Path,
    buckets: &[MonthlyBucket],
    summary: &SalesSummary,
    range: TimeRange,
) -> Result<(), AppError> {
    let format = ExportFormat::from_path(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create export '{}': {e}", path.display())))?;

    match format {
        ExportFormat::Csv => write_csv(file, buckets)?,
        ExportFormat::Json => {
            let export = SalesExport {
                range: range.display_name(),
                summary,
                buckets,
            };
            serde_json::to_writer_pretty(file, &export)
                .map_err(|e| AppError::runtime(format!("Failed to write export JSON: {e}")))?;
        }
    }

    tracing::info!(path = %path.display(), rows = buckets.len(), "wrote sales export");
    Ok(())
}

fn write_csv(mut out: impl Write, buckets: &[MonthlyBucket]) -> Result<(), AppError> {
    writeln!(out, "period,sales_total,returns_total,return_rate_pct")
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV header: {e}")))?;

    for b in buckets {
        writeln!(
            out,
            "{},{:.2},{:.2},{:.4}",
            b.label,
            b.sales_total,
            b.returns_total,
            return_rate_pct(b.sales_total, b.returns_total),
        )
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::Period;

    fn buckets() -> Vec<MonthlyBucket> {
        vec![
            MonthlyBucket {
                period: Period::Month { year: 2024, month: 1 },
                label: "Jan 2024".to_string(),
                sales_total: 150.0,
                returns_total: 50.0,
            },
            MonthlyBucket {
                period: Period::Month { year: 2024, month: 2 },
                label: "Feb 2024".to_string(),
                sales_total: 200.0,
                returns_total: 0.0,
            },
        ]
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("salesdash-{}-{name}", std::process::id()))
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out.CSV")).unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("a/b.json")).unwrap(), ExportFormat::Json);
        assert!(ExportFormat::from_path(Path::new("report.xlsx")).is_err());
        assert!(ExportFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn csv_rows() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &buckets()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "period,sales_total,returns_total,return_rate_pct");
        assert_eq!(lines[1], "Jan 2024,150.00,50.00,33.3333");
        assert_eq!(lines[2], "Feb 2024,200.00,0.00,0.0000");
    }

    #[test]
    fn json_export_carries_summary_and_labels() {
        let path = temp_path("export.json");
        let b = buckets();
        let summary = crate::analytics::summarize(&b);
        write_sales_export(&path, &b, &summary, TimeRange::SixMonths).unwrap();

        let value: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(value["range"], "Last 6 months");
        assert_eq!(value["summary"]["total_sales"], 350.0);
        assert_eq!(value["buckets"][0]["period"], "Jan 2024");
        assert_eq!(value["buckets"][1]["returns_total"], 0.0);
    }
}
