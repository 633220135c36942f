//! # Core Error Type
//!
//! Errors raised by the validated constructors in this crate. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Workflow- and engine-level failures have their own taxonomies in the
//! crates that own them; `CoreError` covers only the primitives defined
//! here (timestamps, currency codes, amounts).

use thiserror::Error;

/// Errors from the foundational type constructors.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A timestamp string failed to parse or used a non-UTC offset.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A currency code is not a three-letter uppercase ISO-4217 code.
    #[error("invalid currency code: {0:?}")]
    InvalidCurrency(String),

    /// A monetary amount must be strictly positive.
    #[error("monetary amount must be positive, got {0} minor units")]
    NonPositiveAmount(i64),
}
