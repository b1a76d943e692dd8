//! Product catalog.
//!
//! Products carry the pricing profile the engine prices quote lines from.

pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

pub use models::Product;
pub use routes::router;
