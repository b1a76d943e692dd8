//! Request DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::calculators::{LineItemRequest, PricingProfile};

/// Pricing parameters supplied inline (catalog-independent preview)
#[derive(Debug, Deserialize)]
pub struct PricingProfileRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price_per_unit_area: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub complexity_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub thickness_base_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub minimum_price: Decimal,
}

impl From<&PricingProfileRequest> for PricingProfile {
    fn from(req: &PricingProfileRequest) -> Self {
        PricingProfile {
            base_price_per_unit_area: req.base_price_per_unit_area,
            complexity_factor: req.complexity_factor,
            thickness_base_factor: req.thickness_base_factor,
            minimum_price: req.minimum_price,
        }
    }
}

/// Dimensions and quantity of one piece
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemPayload {
    #[serde(with = "rust_decimal::serde::str")]
    pub width_cm: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub length_cm: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub thickness_mm: Option<Decimal>,
    pub quantity: i32,
}

impl From<&LineItemPayload> for LineItemRequest {
    fn from(req: &LineItemPayload) -> Self {
        LineItemRequest {
            width_cm: req.width_cm,
            length_cm: req.length_cm,
            thickness_mm: req.thickness_mm,
            quantity: req.quantity,
        }
    }
}

/// Request to price a single line
#[derive(Debug, Deserialize)]
pub struct PriceLineRequest {
    pub profile: PricingProfileRequest,
    pub item: LineItemPayload,
}

/// A line total in the totals request
#[derive(Debug, Deserialize)]
pub struct LineTotalRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub line_total: Decimal,
}

/// Request to aggregate quote totals
#[derive(Debug, Deserialize)]
pub struct QuoteTotalsRequest {
    #[serde(default)]
    pub lines: Vec<LineTotalRequest>,
    /// Falls back to the configured default rate
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub tax_rate_percent: Option<Decimal>,
}
