//! Tracing Setup
//!
//! Initializes console tracing for the engine.
//!
//! # Configuration
//!
//! - `RUST_LOG`: Overrides the configured log level filter
//! - `NODE_ENV`: Set to `development` for ANSI pretty output
//!
//! # Usage
//!
//! ```rust,ignore
//! use settlement_engine::telemetry::init_telemetry;
//!
//! #[tokio::main]
//! async fn main() {
//!     init_telemetry(&config.logging);
//!     // ... application code
//! }
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize console tracing from the logging config.
///
/// The `RUST_LOG` environment variable takes precedence over the
/// configured level.
///
/// # Panics
///
/// Panics if tracing subscriber initialization fails, which only happens
/// when a global subscriber is already set.
pub fn init_telemetry(config: &LoggingConfig) {
    let is_development = std::env::var("NODE_ENV")
        .map(|v| v == "development")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    if config.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(!is_development)
            .with_ansi(is_development)
            .init();
    }

    tracing::info!(level = %config.level, format = %config.format, "tracing initialized");
}
