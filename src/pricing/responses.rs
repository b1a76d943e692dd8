//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{PriceBreakdown, PriceResult, QuoteTotals};

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

/// Response for a priced line
#[derive(Debug, Serialize)]
pub struct PriceResultResponse {
    pub unit_price: MoneyResponse,
    pub line_total: MoneyResponse,
}

impl PriceResultResponse {
    pub fn new(result: &PriceResult, currency: &str) -> Self {
        Self {
            unit_price: MoneyResponse::new(result.unit_price, currency),
            line_total: MoneyResponse::new(result.line_total, currency),
        }
    }
}

/// Response for a line price preview, with the factors applied
#[derive(Debug, Serialize)]
pub struct PriceBreakdownResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub area_m2: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub thickness_mm: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub thickness_multiplier: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub area_adjustment: Decimal,
    pub minimum_applied: bool,
    pub unit_price: MoneyResponse,
    pub line_total: MoneyResponse,
}

impl PriceBreakdownResponse {
    pub fn new(breakdown: &PriceBreakdown, currency: &str) -> Self {
        Self {
            area_m2: breakdown.area_m2,
            thickness_mm: breakdown.thickness_mm,
            thickness_multiplier: breakdown.thickness_multiplier,
            area_adjustment: breakdown.area_adjustment,
            minimum_applied: breakdown.minimum_applied,
            unit_price: MoneyResponse::new(breakdown.result.unit_price, currency),
            line_total: MoneyResponse::new(breakdown.result.line_total, currency),
        }
    }
}

/// Response for quote totals
#[derive(Debug, Serialize)]
pub struct QuoteTotalsResponse {
    pub total_before_tax: MoneyResponse,
    pub tax_amount: MoneyResponse,
    pub total_with_tax: MoneyResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax_rate_percent: Decimal,
}

impl QuoteTotalsResponse {
    pub fn new(totals: &QuoteTotals, tax_rate_percent: Decimal, currency: &str) -> Self {
        Self {
            total_before_tax: MoneyResponse::new(totals.total_before_tax, currency),
            tax_amount: MoneyResponse::new(totals.tax_amount, currency),
            total_with_tax: MoneyResponse::new(totals.total_with_tax, currency),
            tax_rate_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_serializes_as_string() {
        let money = MoneyResponse::new(dec!(180.00), "EUR");
        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json["amount"], "180.00");
        assert_eq!(json["currency"], "EUR");
    }
}
