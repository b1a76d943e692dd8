//! Quotes: client quotes made of priced glazing lines, with a
//! pending / validated / rejected lifecycle.

pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

pub use models::{Quote, QuoteDetail, QuoteItem, QuoteStatus};
pub use routes::router;
pub use services::QuoteError;
