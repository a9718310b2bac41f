//! Error taxonomy shared across the crate.
//!
//! All failures are raised synchronously at construction or injection
//! time. A failed call never leaves partially mutated state behind.

use thiserror::Error;

/// Errors produced by interval resolution, fault application, and table
/// materialization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FaultError {
    /// The resolved window would violate `0 <= start < stop <= length`.
    #[error("invalid interval [{start}, {stop}) over sequence of length {length}")]
    InvalidInterval {
        start: usize,
        stop: usize,
        length: usize,
    },

    /// A caller-supplied parameter violates its variant's contract.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A table assignment references a column the target table lacks.
    #[error("unknown column '{0}' in target table")]
    UnknownColumn(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FaultError>;
