//! Data Transfer Objects (DTOs).

mod meal_dto;

pub use meal_dto::*;
