//! # Bistro Server Library
//!
//! Dependency injection wiring and startup helpers for the Bistro server.

pub mod di;
pub mod startup;
