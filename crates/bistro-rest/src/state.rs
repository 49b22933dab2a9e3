//! Application state for Axum handlers.

use bistro_core::HealthCheck;
use bistro_service::MealService;
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub meal_service: Arc<dyn MealService>,
    /// Dependencies probed by the readiness endpoint.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(meal_service: Arc<dyn MealService>) -> Self {
        Self {
            meal_service,
            health_checks: Vec::new(),
        }
    }

    /// Resolves the services from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: Module + HasComponent<dyn MealService>,
    {
        Self::new(module.resolve())
    }

    /// Adds a dependency to the readiness probe.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}
