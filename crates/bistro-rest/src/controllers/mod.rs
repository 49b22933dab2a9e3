//! REST API controllers.

pub mod health_controller;
pub mod meal_controller;

pub use health_controller::*;
