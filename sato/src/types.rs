//! Shared scalar types.

/// Integer constant used for domains, coefficients and bounds.
pub type Int = i64;
