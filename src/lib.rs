pub mod analytics;
pub mod briefing;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod models;
pub mod utils;

#[cfg(feature = "ssr")]
pub mod api;
#[cfg(feature = "ssr")]
pub mod db;

pub use dashboard::DashboardData;
pub use error::DataError;
