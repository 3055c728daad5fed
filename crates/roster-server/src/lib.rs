//! # Roster Server Library
//!
//! Wiring for the Roster binary: dependency injection, telemetry setup and
//! startup output.

pub mod di;
pub mod startup;
pub mod telemetry;
