//! Configuration and logging setup for hotcheck

pub mod config;
pub mod logging;

pub use config::{AppConfig, LogFormat, LoggingConfig};
