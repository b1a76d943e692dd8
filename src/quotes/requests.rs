//! Request DTOs for quote endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::pricing::LineItemRequest;

use super::models::QuoteStatus;

/// Create or replace a quote
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub client_name: String,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Falls back to the configured default rate on creation, and to the
    /// quote's current rate on update
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub tax_rate_percent: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<QuoteItemRequest>,
}

/// One requested line of a quote
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteItemRequest {
    pub product_id: Uuid,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub width_cm: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub length_cm: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub thickness_mm: Option<Decimal>,
    pub quantity: i32,
}

impl QuoteItemRequest {
    pub fn line_item(&self) -> LineItemRequest {
        LineItemRequest {
            width_cm: self.width_cm,
            length_cm: self.length_cm,
            thickness_mm: self.thickness_mm,
            quantity: self.quantity,
        }
    }
}

/// Query parameters for quote listing
#[derive(Debug, Deserialize)]
pub struct QuoteListQuery {
    #[serde(default)]
    pub status: Option<QuoteStatus>,
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_quote_request() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{
                "client_name": "Atelier Martin",
                "tax_rate_percent": "10",
                "items": [{
                    "product_id": "6f1c1f5e-2d7a-4a53-9d0e-6a7d3c2b1a00",
                    "width_cm": "120",
                    "length_cm": "80",
                    "quantity": 3
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(request.tax_rate_percent, Some(dec!(10)));
        assert!(request.client_email.is_none());
        assert_eq!(request.items.len(), 1);

        let line = request.items[0].line_item();
        assert_eq!(line.width_cm, dec!(120));
        assert_eq!(line.thickness_mm, None);
        assert_eq!(line.quantity, 3);
    }

    #[test]
    fn test_list_query_defaults() {
        let query: QuoteListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert!(query.status.is_none());
    }
}
