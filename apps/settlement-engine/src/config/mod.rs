//! Configuration module for the settlement engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for the pricing, points, referral, payout, and cart
//! policies.
//!
//! # Usage
//!
//! ```rust,ignore
//! use settlement_engine::config::{CommerceConfig, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! // Access configuration values
//! println!("tax rate: {}", config.pricing.tax_rate);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::merchant::{PayoutPolicy, ReferralPolicy};
use crate::domain::points::PointsPolicy;
use crate::domain::pricing::PricingPolicy;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommerceConfig {
    /// Pricing policy: tax, shipping rates, points redemption value.
    pub pricing: PricingPolicy,
    /// Points economy policy: earn rate and signup bonus.
    pub points: PointsPolicy,
    /// Referral attribution policy.
    pub referral: ReferralPolicy,
    /// Payout policy.
    pub payout: PayoutPolicy,
    /// Cart lifecycle configuration.
    pub cart: CartConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Cart lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Days of inactivity before a cart is swept.
    pub expiry_days: i64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self { expiry_days: 30 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: String,
    /// Output format: "json" or "pretty".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<CommerceConfig, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<CommerceConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: CommerceConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let mut result = input.to_string();

    // Match ${VAR} or ${VAR:-default} patterns
    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    for cap in re.captures_iter(input) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let Some(var_match) = cap.get(1) else {
            continue;
        };
        let full_match = full_match.as_str();
        let var_name = var_match.as_str();
        let default_value = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        };

        result = result.replace(full_match, &value);
    }

    result
}

/// Validate configuration values.
fn validate_config(config: &CommerceConfig) -> Result<(), ConfigError> {
    if config.pricing.tax_rate < Decimal::ZERO || config.pricing.tax_rate > Decimal::ONE {
        return Err(ConfigError::ValidationError(
            "pricing.tax_rate must be between 0 and 1".to_string(),
        ));
    }

    if config.pricing.points_unit_value <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "pricing.points_unit_value must be positive".to_string(),
        ));
    }

    if config.points.order_earn_rate < Decimal::ZERO || config.points.order_earn_rate > Decimal::ONE
    {
        return Err(ConfigError::ValidationError(
            "points.order_earn_rate must be between 0 and 1".to_string(),
        ));
    }

    if config.referral.default_commission_rate < Decimal::ZERO
        || config.referral.default_commission_rate > Decimal::ONE
    {
        return Err(ConfigError::ValidationError(
            "referral.default_commission_rate must be between 0 and 1".to_string(),
        ));
    }

    if config.referral.expiry_days <= 0 {
        return Err(ConfigError::ValidationError(
            "referral.expiry_days must be positive".to_string(),
        ));
    }

    if config.payout.default_minimum.amount() < Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "payout.default_minimum must not be negative".to_string(),
        ));
    }

    if config.cart.expiry_days <= 0 {
        return Err(ConfigError::ValidationError(
            "cart.expiry_days must be positive".to_string(),
        ));
    }

    Ok(())
}
