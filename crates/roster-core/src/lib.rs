//! # Roster Core
//!
//! Core types, traits, and error definitions shared by every Roster crate:
//! the error taxonomy, typed identifiers, pagination windows and the user
//! entity itself.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod timeout;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use timeout::with_timeout;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
