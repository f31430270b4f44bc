//! Data providers: the backend HTTP client, static panel content, and the
//! synthetic demo generator.

pub mod api;
pub mod mock;
pub mod sample;

pub use api::{ApiError, DashboardClient};
pub use sample::{DemoConfig, generate_sales};
