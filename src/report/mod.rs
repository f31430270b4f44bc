//! Text reports for the CLI subcommands.

pub mod format;

pub use format::*;
