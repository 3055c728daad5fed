//! Custom Axum extractors.

mod json;
mod pagination;
mod query;

pub use json::*;
pub use pagination::*;
pub use query::*;
