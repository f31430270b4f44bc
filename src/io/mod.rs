//! File output helpers.

pub mod export;

pub use export::{ExportFormat, write_sales_export};
