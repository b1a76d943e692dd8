//! Environment-driven configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by `dotenvy` in `main`.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// VAT applied when a quote does not carry its own rate
    pub default_tax_rate_percent: Decimal,
    /// ISO 4217 code attached to every amount in responses
    pub currency: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {}", raw))?,
            None => 8080,
        };

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {}", raw))?,
            None => 5,
        };

        let default_tax_rate_percent = match lookup("DEFAULT_TAX_RATE_PERCENT") {
            Some(raw) => raw
                .parse::<Decimal>()
                .with_context(|| format!("DEFAULT_TAX_RATE_PERCENT is not a decimal: {}", raw))?,
            None => dec!(20),
        };
        if default_tax_rate_percent < Decimal::ZERO {
            anyhow::bail!(
                "DEFAULT_TAX_RATE_PERCENT must not be negative (got {})",
                default_tax_rate_percent
            );
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url,
            database_max_connections,
            default_tax_rate_percent,
            currency: lookup("CURRENCY").unwrap_or_else(|| "EUR".to_string()),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
