//! Result type aliases for Bistro.

use crate::BistroError;

/// A specialized `Result` type for Bistro operations.
pub type BistroResult<T> = Result<T, BistroError>;
