//! Request DTOs for catalog endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppError;
use crate::pricing::PricingProfile;

/// Create or replace a product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price_per_unit_area: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub complexity_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub thickness_base_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub minimum_price: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ProductRequest {
    pub fn pricing_profile(&self) -> PricingProfile {
        PricingProfile {
            base_price_per_unit_area: self.base_price_per_unit_area,
            complexity_factor: self.complexity_factor,
            thickness_base_factor: self.thickness_base_factor,
            minimum_price: self.minimum_price,
        }
    }

    /// A product that the engine cannot price is never stored.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name", "Product name must not be empty"));
        }
        self.pricing_profile().validate()?;
        Ok(())
    }
}

/// Query parameters for product listing
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}
