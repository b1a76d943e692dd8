//! Database models for quotes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::pricing::QuoteTotals;

/// Quote lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "quote_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Validated,
    Rejected,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 3] = [QuoteStatus::Pending, QuoteStatus::Validated, QuoteStatus::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Validated => "validated",
            QuoteStatus::Rejected => "rejected",
        }
    }

    /// Only pending quotes can be decided; decisions are final.
    pub fn can_transition_to(&self, target: QuoteStatus) -> bool {
        matches!(
            (self, target),
            (QuoteStatus::Pending, QuoteStatus::Validated) | (QuoteStatus::Pending, QuoteStatus::Rejected)
        )
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(QuoteStatus::Pending),
            "validated" => Ok(QuoteStatus::Validated),
            "rejected" => Ok(QuoteStatus::Rejected),
            other => Err(format!("unknown quote status: {}", other)),
        }
    }
}

/// Quote from quotes
#[derive(Debug, Clone, FromRow)]
pub struct Quote {
    pub id: Uuid,
    pub reference: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub notes: Option<String>,
    pub status: QuoteStatus,
    pub tax_rate_percent: Decimal,
    pub total_before_tax: Decimal,
    pub tax_amount: Decimal,
    pub total_with_tax: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl Quote {
    pub fn is_editable(&self) -> bool {
        self.status == QuoteStatus::Pending
    }

    pub fn totals(&self) -> QuoteTotals {
        QuoteTotals {
            total_before_tax: self.total_before_tax,
            tax_amount: self.tax_amount,
            total_with_tax: self.total_with_tax,
        }
    }
}

/// Priced line from quote_items
#[derive(Debug, Clone, FromRow)]
pub struct QuoteItem {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub product_id: Uuid,
    /// Product name at the time the line was priced
    pub product_name: String,
    pub description: Option<String>,
    pub width_cm: Decimal,
    pub length_cm: Decimal,
    pub thickness_mm: Decimal,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub position: i32,
}

/// A quote together with its lines
#[derive(Debug, Clone)]
pub struct QuoteDetail {
    pub quote: Quote,
    pub items: Vec<QuoteItem>,
}
