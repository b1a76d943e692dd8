//! Response DTOs for catalog endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::models::Product;

/// Product as returned by the API
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price_per_unit_area: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub complexity_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub thickness_base_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub minimum_price: Decimal,
    pub currency: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn from_product(product: &Product, currency: &str) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            base_price_per_unit_area: product.base_price_per_unit_area,
            complexity_factor: product.complexity_factor,
            thickness_base_factor: product.thickness_base_factor,
            minimum_price: product.minimum_price,
            currency: currency.to_string(),
            active: product.active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
