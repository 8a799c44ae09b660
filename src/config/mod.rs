#[allow(clippy::module_inception)] mod config;
mod error;


pub use config::StatsConfig;
pub use error::ConfigError;
