//! Pricing engine module.
//!
//! Deterministic glazing price calculations. `calculators` holds the pure
//! math and is the only place prices are computed; `routes` exposes a
//! preview API on top of it.

pub mod calculators;
pub mod error;
pub mod requests;
pub mod responses;
pub mod routes;

// Re-export commonly used items
pub use calculators::{
    compute_line_price, compute_quote_totals, explain_line_price, round_money, LineItemRequest,
    PriceBreakdown, PriceResult, PricingProfile, QuoteTotals,
};
pub use error::PricingError;
pub use responses::MoneyResponse;
pub use routes::router;
