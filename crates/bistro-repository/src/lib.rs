//! # Bistro Repository
//!
//! Persistent store for meals.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn MealRepository>        (domain interface)
//! MySqlMealRepository                 (SQLx queries)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
