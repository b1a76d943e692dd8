//! Server-rendered pages

pub mod quotes;
