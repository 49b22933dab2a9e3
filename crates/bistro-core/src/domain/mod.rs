//! Domain records for the meal catalogue.

pub mod meal;

pub use meal::*;
