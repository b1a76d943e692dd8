//! Database models for the product catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::pricing::PricingProfile;

/// Product from catalog_products
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub base_price_per_unit_area: Decimal,
    pub complexity_factor: Decimal,
    pub thickness_base_factor: Decimal,
    pub minimum_price: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Pricing parameters handed to the engine
    pub fn pricing_profile(&self) -> PricingProfile {
        PricingProfile {
            base_price_per_unit_area: self.base_price_per_unit_area,
            complexity_factor: self.complexity_factor,
            thickness_base_factor: self.thickness_base_factor,
            minimum_price: self.minimum_price,
        }
    }
}
