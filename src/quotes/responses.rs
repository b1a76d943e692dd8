//! Response DTOs for quote endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::pricing::responses::QuoteTotalsResponse;
use crate::pricing::MoneyResponse;

use super::models::{Quote, QuoteDetail, QuoteItem, QuoteStatus};
use super::services::QuotePage;

/// Response for a quote line
#[derive(Debug, Serialize)]
pub struct QuoteItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub width_cm: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub length_cm: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub thickness_mm: Decimal,
    pub quantity: i32,
    pub unit_price: MoneyResponse,
    pub line_total: MoneyResponse,
}

impl QuoteItemResponse {
    fn new(item: &QuoteItem, currency: &str) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            description: item.description.clone(),
            width_cm: item.width_cm,
            length_cm: item.length_cm,
            thickness_mm: item.thickness_mm,
            quantity: item.quantity,
            unit_price: MoneyResponse::new(item.unit_price, currency),
            line_total: MoneyResponse::new(item.line_total, currency),
        }
    }
}

/// Response for a full quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub id: Uuid,
    pub reference: String,
    pub status: QuoteStatus,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<QuoteItemResponse>,
    pub totals: QuoteTotalsResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl QuoteResponse {
    pub fn new(detail: &QuoteDetail, currency: &str) -> Self {
        let quote = &detail.quote;
        Self {
            id: quote.id,
            reference: quote.reference.clone(),
            status: quote.status,
            client_name: quote.client_name.clone(),
            client_email: quote.client_email.clone(),
            client_phone: quote.client_phone.clone(),
            client_address: quote.client_address.clone(),
            notes: quote.notes.clone(),
            items: detail
                .items
                .iter()
                .map(|i| QuoteItemResponse::new(i, currency))
                .collect(),
            totals: QuoteTotalsResponse::new(&quote.totals(), quote.tax_rate_percent, currency),
            created_at: quote.created_at,
            updated_at: quote.updated_at,
            decided_at: quote.decided_at,
        }
    }
}

/// Response for a quote in a listing
#[derive(Debug, Serialize)]
pub struct QuoteSummaryResponse {
    pub id: Uuid,
    pub reference: String,
    pub status: QuoteStatus,
    pub client_name: String,
    pub total_with_tax: MoneyResponse,
    pub created_at: DateTime<Utc>,
}

impl QuoteSummaryResponse {
    pub fn new(quote: &Quote, currency: &str) -> Self {
        Self {
            id: quote.id,
            reference: quote.reference.clone(),
            status: quote.status,
            client_name: quote.client_name.clone(),
            total_with_tax: MoneyResponse::new(quote.total_with_tax, currency),
            created_at: quote.created_at,
        }
    }
}

/// Response for quote listing
#[derive(Debug, Serialize)]
pub struct QuoteListResponse {
    pub quotes: Vec<QuoteSummaryResponse>,
    pub page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl QuoteListResponse {
    pub fn new(page: &QuotePage, currency: &str) -> Self {
        Self {
            quotes: page
                .quotes
                .iter()
                .map(|q| QuoteSummaryResponse::new(q, currency))
                .collect(),
            page: page.page,
            total: page.total,
            total_pages: page.total_pages,
        }
    }
}
