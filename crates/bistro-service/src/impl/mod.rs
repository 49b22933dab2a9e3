//! Meal service implementations.
//!
//! Trait definitions live in the parent module (`meal_service.rs`).

pub mod meal_service_impl;

pub use meal_service_impl::{MealServiceComponent, MealServiceComponentParameters};
