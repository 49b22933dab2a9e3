//! MySQL repository implementations.

mod meal_repository;

pub use meal_repository::*;
