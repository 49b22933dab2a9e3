//! Typed ID wrappers for domain records.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::num::ParseIntError;

/// A strongly-typed wrapper for meal identifiers.
///
/// Meals are keyed by the auto-increment primary key of the `meals` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct MealId(pub i64);

impl MealId {
    /// Creates a meal ID from its raw value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parses a meal ID from a path segment.
    pub fn parse(s: &str) -> Result<Self, ParseIntError> {
        Ok(Self(s.trim().parse()?))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MealId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MealId> for i64 {
    fn from(id: MealId) -> Self {
        id.0
    }
}
