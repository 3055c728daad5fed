//! # Roster REST
//!
//! HTTP surface for Roster built on Axum: user CRUD endpoints, health
//! reporting, Prometheus exposition and the OpenAPI document.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
