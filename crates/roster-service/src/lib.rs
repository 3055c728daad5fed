//! # Roster Service
//!
//! The cache-aside layer: the cache adapters and key scheme, and the user
//! service that coordinates them with the record store.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod metrics;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::*;
pub use user_service::*;
