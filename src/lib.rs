//! `salesdash` library crate.
//!
//! The binary (`dash`) is a thin wrapper around this library so that:
//!
//! - aggregation and formatting are testable without spawning processes
//! - the TUI and the one-shot CLI commands share one data pipeline

pub mod analytics;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod tui;
