//! # Bistro Service
//!
//! Business logic for meals: the read-through meal cache, popularity
//! tracking, and the CRUD service the REST layer calls into.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod meal_cache;
pub mod meal_service;

pub use cache::*;
pub use dto::*;
pub use meal_cache::*;
pub use meal_service::*;
pub use r#impl::*;
